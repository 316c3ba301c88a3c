// Integration tests for the AtomC analysis pipeline

use atomc::diagnostics::Diagnostics;
use atomc::driver::{Mode, TestDriver};
use atomc::parser::lexer::Lexer;
use atomc::parser::parse::Parser;
use atomc::parser::token::{Token, TokenKind};
use atomc::source::CharStream;
use atomc::symbols::{Class, SemanticContext, Storage, TypeBase};

/// Run the whole pipeline over an in-memory source.
fn run_pipeline(source: &str) -> (Vec<Token>, bool, SemanticContext, Diagnostics) {
    let mut src = CharStream::from_str(source);
    let mut diag = Diagnostics::new();
    let tokens = Lexer::new(&mut src, &mut diag).analyze();

    let mut ctx = SemanticContext::new();
    let syntax_ok = Parser::new(tokens.clone(), &mut ctx, &mut diag).unit();
    (tokens, syntax_ok, ctx, diag)
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_hex_and_decimal_literals() {
    let (tokens, syntax_ok, ctx, diag) = run_pipeline("int x = 0xA + 10;");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Int,
            TokenKind::Id,
            TokenKind::Assign,
            TokenKind::CtInt,
            TokenKind::Add,
            TokenKind::CtInt,
            TokenKind::Semicolon,
        ]
    );
    assert_eq!(tokens[1].lexeme, "x");
    assert_eq!(tokens[3].lexeme, "0xA");
    assert_eq!(tokens[5].lexeme, "10");

    assert!(syntax_ok);
    assert_eq!(diag.syntax_count(), 0);

    let x = ctx.symbols.get(ctx.symbols.find("x").unwrap());
    assert_eq!(x.cls, Class::Var);
    assert_eq!(x.depth, 0);
    assert_eq!(ctx.symbols.len(), 1);
}

#[test]
fn test_invalid_octal_breaks_the_initializer() {
    let (tokens, syntax_ok, ctx, diag) = run_pipeline("int y = 089;");

    // The bad literal is reported and contributes no token.
    assert_eq!(diag.lexical_count(), 1);
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Int,
            TokenKind::Id,
            TokenKind::Assign,
            TokenKind::Semicolon,
        ]
    );

    // The parser then finds `;` where the initializer should be.
    assert!(!syntax_ok);
    assert_eq!(diag.syntax_count(), 1);

    // The declaration itself still registered.
    assert!(ctx.symbols.find("y").is_some());
}

#[test]
fn test_exponent_is_one_real_token() {
    let (tokens, syntax_ok, _, diag) = run_pipeline("double d = 4.56E-2;");

    assert_eq!(tokens[3].kind, TokenKind::CtReal);
    assert_eq!(tokens[3].lexeme, "4.56E-2");
    assert!(syntax_ok);
    assert_eq!(diag.lexical_count(), 0);
}

#[test]
fn test_string_escapes_are_stored_raw() {
    let (tokens, _, _, diag) = run_pipeline(r#"char s[] = "a\"b\\";"#);

    let literal = tokens
        .iter()
        .find(|t| t.kind == TokenKind::CtString)
        .expect("string literal token");
    assert_eq!(literal.lexeme, r#"a\"b\\"#);
    assert_eq!(literal.lexeme.len(), 6);
    assert_eq!(diag.lexical_count(), 0);
}

#[test]
fn test_struct_member_redefinition() {
    let (_, syntax_ok, ctx, diag) = run_pipeline("struct P { int x; int x; };");

    assert!(syntax_ok, "parse succeeds despite the semantic error");
    assert_eq!(diag.semantic_count(), 1);

    let p = ctx.symbols.get(ctx.symbols.find("P").unwrap());
    assert_eq!(p.cls, Class::Struct);
    // No duplicate names in the member list.
    assert_eq!(p.members.len(), 1);
    assert_eq!(p.members[0].name, "x");
}

#[test]
fn test_scope_teardown_and_shadowing() {
    let (_, syntax_ok, ctx, diag) = run_pipeline("void f(){ int a; { int a; } int a; }");

    assert!(syntax_ok);
    // Inner `a` shadows without error; the re-declaration at function depth
    // is the one redefinition.
    assert_eq!(diag.semantic_count(), 1);

    // After the function closes, only its own symbol survives.
    assert_eq!(ctx.symbols.len(), 1);
    let f = ctx.symbols.get(ctx.symbols.find("f").unwrap());
    assert_eq!(f.cls, Class::Func);
    assert_eq!(f.depth, 0);
}

#[test]
fn test_full_program() {
    let source = r#"
        struct Point {
            int x, y;
        };

        struct Point origin;
        int board[8], free_cells = 64;
        double ratio = 2.5e-1;

        int taxicab(struct Point p) {
            int dx, dy;
            dx = p.x;
            dy = p.y;
            if (dx < 0)
                dx = -dx;
            if (dy < 0)
                dy = -dy;
            return dx + dy;
        }

        void reset(int n) {
            int i;
            for (i = 0; i < n; i = i + 1) {
                board[i] = 0;
            }
            while (free_cells > 0) {
                free_cells = free_cells - 1;
                if (free_cells == 8)
                    break;
            }
        }
    "#;
    let (_, syntax_ok, ctx, diag) = run_pipeline(source);

    assert!(syntax_ok);
    assert_eq!(diag.lexical_count(), 0);
    assert_eq!(diag.syntax_count(), 0);
    assert_eq!(diag.semantic_count(), 0);

    // Globals and functions survive; locals and args are gone.
    for name in ["Point", "origin", "board", "free_cells", "ratio", "taxicab", "reset"] {
        assert!(ctx.symbols.find(name).is_some(), "missing symbol {name}");
    }
    assert!(ctx.symbols.find("dx").is_none());
    assert!(ctx.symbols.find("i").is_none());
    assert!(ctx.symbols.find("p").is_none());

    // Declaration order is preserved in the table.
    let names: Vec<&str> = ctx.symbols.all().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Point", "origin", "board", "free_cells", "ratio", "taxicab", "reset"]
    );

    let board = ctx.symbols.get(ctx.symbols.find("board").unwrap());
    assert_eq!(board.ty.n_elements, 8);
    let taxicab = ctx.symbols.get(ctx.symbols.find("taxicab").unwrap());
    assert_eq!(taxicab.args.len(), 1);
    assert_eq!(taxicab.args[0].name, "p");
    assert_eq!(taxicab.args[0].mem, Storage::Arg);
    assert_eq!(taxicab.args[0].ty.base, TypeBase::Struct);
}

#[test]
fn test_struct_type_resolution_through_members() {
    let (_, syntax_ok, ctx, _) = run_pipeline(
        "struct Inner { int v; }; struct Outer { struct Inner nested; }; struct Outer o;",
    );
    assert!(syntax_ok);

    let inner = ctx.symbols.find("Inner").unwrap();
    let outer = ctx.symbols.get(ctx.symbols.find("Outer").unwrap());
    let nested = outer.find_member("nested").unwrap();
    assert_eq!(nested.ty.base, TypeBase::Struct);
    assert_eq!(nested.ty.struct_ref, Some(inner));

    let o = ctx.symbols.get(ctx.symbols.find("o").unwrap());
    assert_eq!(o.ty.struct_ref, Some(ctx.symbols.find("Outer").unwrap()));
}

#[test]
fn test_analysis_continues_after_errors() {
    // One bad statement must not hide the declarations after it.
    let source = r#"
        int first;
        void broken() { if (x 1; }
        int last;
    "#;
    let (_, syntax_ok, ctx, diag) = run_pipeline(source);

    assert!(!syntax_ok);
    assert!(diag.syntax_count() >= 1);
    assert!(ctx.symbols.find("first").is_some());
    assert!(ctx.symbols.find("last").is_some());
}

#[test]
fn test_symbol_listing_format() {
    let (_, _, ctx, _) = run_pipeline("int g; void f(int a) { }");

    let listing: Vec<String> = ctx
        .symbols
        .all()
        .iter()
        .map(|s| format!("  - {}", s))
        .collect();
    assert_eq!(listing[0], "  - g [CLS=0, MEM=0, DEPTH=0]");
    assert_eq!(listing[1], "  - f [CLS=1, MEM=0, DEPTH=0]");
}

#[test]
fn test_token_listing_format() {
    let (tokens, _, _, _) = run_pipeline("foo");
    assert_eq!(
        tokens[0].to_string(),
        "Token(foo, type: ID, line: 1, column: 1)"
    );
}

#[test]
fn test_driver_runs_the_sample_corpus() {
    // The corpus contains both clean and deliberately broken files; the run
    // itself must still complete.
    let driver = TestDriver::new("AtomC-tests", Mode::Automatic);
    assert!(driver.run().is_ok());
}

#[test]
fn test_driver_missing_directory_is_an_error() {
    let driver = TestDriver::new("no-such-directory", Mode::Automatic);
    assert!(driver.run().is_err());
}
