//! End-to-end exercise of the whole crate: lex a tiny assignment
//! language out of source text, declare its one variable, write the
//! resulting tokens to an intermediate-code stream, then read that
//! stream back with a `BinaryScanner` and recall the declared symbol.

use std::cell::RefCell;
use std::rc::Rc;

use parsekit::error_log::DefaultErrorLog;
use parsekit::language::{CaseFolding, LanguageDefinition};
use parsekit::opcode::{self, CAT_USER};
use parsekit::parser::Parser;
use parsekit::rule::SyntaxRule;
use parsekit::scanner::source::SourceScanner;
use parsekit::scanner::{BinaryScanner, Scanner, ScannerFlags};
use parsekit::stream::{ByteStream, CursorStream};
use parsekit::symbol::{Symbol, SymbolCategory, GLOBAL_SCOPE};
use parsekit::symbol_vector::SymbolVectorVector;
use parsekit::token::{Token, TokenKind};

const LET: opcode::Opcode = CAT_USER | 1;
const EQUALS: opcode::Opcode = CAT_USER | 2;

fn assignment_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new(CaseFolding::Exact);
    lang.dict_mut().bind("let", LET);
    lang.dict_mut().bind("=", EQUALS);
    lang.rules_mut()
        .insert(1, SyntaxRule::new([opcode::OPCODE_EOS]));
    lang
}

#[test]
fn source_text_compiles_to_a_stream_and_back() {
    let lang = assignment_language();
    let source = CursorStream::from_bytes("assign.src", b"let answer = 42".to_vec());
    let scanner = SourceScanner::new(source, &lang, ScannerFlags::NO_WHITESPACE).unwrap();

    let log: Rc<RefCell<dyn parsekit::error_log::ErrorLog>> = Rc::new(RefCell::new(DefaultErrorLog::new()));
    let root_lang = Rc::new(RefCell::new(LanguageDefinition::new(CaseFolding::Exact)));
    let output = Rc::new(RefCell::new(CursorStream::new("assign.ic")));
    let mut parser = Parser::new_root(scanner, log.clone(), root_lang).with_output(output.clone());

    // `let`
    assert_eq!(parser.current().opcode, LET);
    parser.current().clone().write_to(&mut *output.borrow_mut()).unwrap();
    parser.next_token();

    // identifier `answer`
    let name_tok = parser.current().clone();
    let name = parser.resolve_pending(&name_tok).expect("identifier must be pending");
    assert_eq!(name, "answer");
    let declared = parser
        .enter_global_symbol(Symbol::from_source(&name, SymbolCategory::VARIABLE, "assign.src", 1))
        .expect("first declaration must succeed");
    let placed_ref = declared.borrow().reference();
    assert_eq!(placed_ref.scope, GLOBAL_SCOPE);
    let placed_tok = Token::symbolic(opcode::CAT_IDENTIFIER, placed_ref);
    placed_tok.write_to(&mut *output.borrow_mut()).unwrap();
    parser.next_token();

    // `=`
    assert_eq!(parser.current().opcode, EQUALS);
    parser.current().clone().write_to(&mut *output.borrow_mut()).unwrap();
    parser.next_token();

    // number `42`
    let number_tok = parser.current().clone();
    assert!(matches!(number_tok.kind, TokenKind::Symbolic(_)));
    let spelling = parser.resolve_pending(&number_tok).unwrap();
    assert_eq!(spelling, "42");
    // Numbers are recorded as literal symbols too, so they round-trip
    // through the same stream the identifier did.
    let literal = parser
        .enter_global_symbol(Symbol::from_source(&spelling, SymbolCategory::LITERAL, "assign.src", 1))
        .expect("literal declarations do not collide by construction here");
    let literal_ref = literal.borrow().reference();
    Token::symbolic(opcode::CAT_NUMBER, literal_ref)
        .write_to(&mut *output.borrow_mut())
        .unwrap();
    parser.next_token();

    assert!(parser.is_at_end());
    assert_eq!(log.borrow().error_count(), 0);

    // Replay the stream written above with a BinaryScanner.
    let bytes = output.borrow().bytes().to_vec();
    let mut replay = BinaryScanner::new(CursorStream::from_bytes("assign.ic", bytes), ScannerFlags::NONE).unwrap();

    assert_eq!(replay.current().opcode, LET);

    replay.advance().unwrap();
    let TokenKind::Symbolic(replayed_name_ref) = replay.current().kind else {
        panic!("expected the identifier's placed reference to survive the round trip");
    };
    assert_eq!(replayed_name_ref, placed_ref);

    replay.advance().unwrap();
    assert_eq!(replay.current().opcode, EQUALS);

    replay.advance().unwrap();
    let TokenKind::Symbolic(replayed_literal_ref) = replay.current().kind else {
        panic!("expected the literal's placed reference to survive the round trip");
    };
    assert_eq!(replayed_literal_ref, literal_ref);

    replay.advance().unwrap();
    assert!(replay.current().is_stream_ending());

    // A later pass recalls both declared symbols purely by reference,
    // the way a code generator reading the stream back would.
    let mut recalled = SymbolVectorVector::new();
    recalled.push_into(
        GLOBAL_SCOPE,
        Symbol::recalled("answer", SymbolCategory::VARIABLE, GLOBAL_SCOPE, replayed_name_ref.index),
    );
    recalled.push_into(
        GLOBAL_SCOPE,
        Symbol::recalled("42", SymbolCategory::LITERAL, GLOBAL_SCOPE, replayed_literal_ref.index),
    );
    assert_eq!(
        recalled.recall(GLOBAL_SCOPE, replayed_name_ref.index).unwrap().name,
        "answer"
    );
    assert_eq!(
        recalled.recall(GLOBAL_SCOPE, replayed_literal_ref.index).unwrap().name,
        "42"
    );
}

#[test]
fn duplicate_declaration_in_the_same_scope_is_reported_and_parsing_continues() {
    let log: Rc<RefCell<dyn parsekit::error_log::ErrorLog>> = Rc::new(RefCell::new(DefaultErrorLog::new()));
    let source = CursorStream::from_bytes("dup.src", b"x x".to_vec());
    let lang = LanguageDefinition::new(CaseFolding::Exact);
    let scanner = SourceScanner::new(source, &lang, ScannerFlags::NO_WHITESPACE).unwrap();
    let root_lang = Rc::new(RefCell::new(LanguageDefinition::new(CaseFolding::Exact)));
    let mut parser = Parser::new_root(scanner, log.clone(), root_lang);

    let first_tok = parser.current().clone();
    let name = parser.resolve_pending(&first_tok).unwrap();
    parser
        .enter_global_symbol(Symbol::from_source(&name, SymbolCategory::VARIABLE, "dup.src", 1))
        .expect("first declaration succeeds");
    parser.next_token();

    let second_tok = parser.current().clone();
    let name_again = parser.resolve_pending(&second_tok).unwrap();
    let second = parser.enter_global_symbol(Symbol::from_source(
        &name_again,
        SymbolCategory::VARIABLE,
        "dup.src",
        1,
    ));
    assert!(second.is_none());
    assert_eq!(log.borrow().error_count(), 1);

    parser.next_token();
    assert!(parser.is_at_end());
}
