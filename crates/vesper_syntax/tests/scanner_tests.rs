use vesper_core::intern::StringInterner;
use vesper_core::text::SourceText;
use vesper_syntax::scanner::Scanner;
use vesper_syntax::syntax_kind::SyntaxKind;
use vesper_syntax::token::{Token, TokenValue};

fn scan(text: &str) -> (Vec<Token>, Vec<vesper_diagnostics::Diagnostic>) {
    let interner = StringInterner::new();
    let source = SourceText::new("test", text);
    let mut scanner = Scanner::new(&source, interner);
    let tokens = scanner.scan_all();
    (tokens, scanner.take_diagnostics().into_diagnostics())
}

fn kinds(text: &str) -> Vec<SyntaxKind> {
    let (tokens, diagnostics) = scan(text);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn scans_operators() {
    assert_eq!(
        kinds("+ - * / ! && || == != < <= > >= & | ^ ~ ="),
        vec![
            SyntaxKind::PlusToken,
            SyntaxKind::MinusToken,
            SyntaxKind::StarToken,
            SyntaxKind::SlashToken,
            SyntaxKind::BangToken,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::PipePipeToken,
            SyntaxKind::EqualsEqualsToken,
            SyntaxKind::BangEqualsToken,
            SyntaxKind::LessToken,
            SyntaxKind::LessOrEqualsToken,
            SyntaxKind::GreaterToken,
            SyntaxKind::GreaterOrEqualsToken,
            SyntaxKind::AmpersandToken,
            SyntaxKind::PipeToken,
            SyntaxKind::HatToken,
            SyntaxKind::TildeToken,
            SyntaxKind::EqualsToken,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn scans_keywords_and_identifiers() {
    assert_eq!(
        kinds("var let if else while for to function fortune"),
        vec![
            SyntaxKind::VarKeyword,
            SyntaxKind::LetKeyword,
            SyntaxKind::IfKeyword,
            SyntaxKind::ElseKeyword,
            SyntaxKind::WhileKeyword,
            SyntaxKind::ForKeyword,
            SyntaxKind::ToKeyword,
            SyntaxKind::FunctionKeyword,
            SyntaxKind::IdentifierToken,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn scans_number_value() {
    let (tokens, diagnostics) = scan("12345");
    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, SyntaxKind::NumberToken);
    assert_eq!(tokens[0].value, TokenValue::Int(12345));
}

#[test]
fn number_overflow_is_reported() {
    let (tokens, diagnostics) = scan("99999999999999999999");
    assert_eq!(tokens[0].kind, SyntaxKind::NumberToken);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1004);
}

#[test]
fn scans_string_with_quote_escape() {
    let interner = StringInterner::new();
    let source = SourceText::new("test", r#""say ""hi""""#);
    let mut scanner = Scanner::new(&source, interner.clone());
    let tokens = scanner.scan_all();
    assert!(scanner.take_diagnostics().is_empty());
    assert_eq!(tokens[0].kind, SyntaxKind::StringToken);
    match tokens[0].value {
        TokenValue::String(s) => assert_eq!(interner.resolve(s), r#"say "hi""#),
        other => panic!("expected a string value, got {:?}", other),
    }
}

#[test]
fn unterminated_string_stops_at_newline() {
    let (tokens, diagnostics) = scan("\"abc\nvar");
    assert_eq!(tokens[0].kind, SyntaxKind::StringToken);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1002);
    // Scanning continues on the next line.
    assert!(tokens.iter().any(|t| t.kind == SyntaxKind::VarKeyword));
}

#[test]
fn comments_are_trivia() {
    assert_eq!(
        kinds("1 // comment with var\n/* block\ncomment */ 2"),
        vec![
            SyntaxKind::NumberToken,
            SyntaxKind::NumberToken,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn unterminated_block_comment_is_reported() {
    let (_, diagnostics) = scan("1 /* never closed");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1003);
}

#[test]
fn bad_character_is_one_token() {
    let (tokens, diagnostics) = scan("1 § 2");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1001);
    assert!(tokens.iter().any(|t| t.kind == SyntaxKind::BadToken));
}
