use super::*;
use aplk_core::Arena;

fn tokenize_str(src: &str) -> (Vec<Token>, Pools, Arena) {
    let mut arena = Arena::new();
    let mut pools = Pools::default();
    let tokens = tokenize(&mut arena, &mut pools, src).expect("tokenizes");
    (tokens, pools, arena)
}

#[test]
fn single_int_is_one_const_token() {
    let (tokens, pools, _arena) = tokenize_str("42");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(tokens[0], Token::Const(0)));
    assert_eq!(pools.consts.unwrap().count(), 1);
}

#[test]
fn int_list_collapses_into_one_const() {
    let (tokens, pools, _arena) = tokenize_str("1 2 3");
    assert_eq!(tokens.len(), 1);
    assert_eq!(pools.consts.unwrap().count(), 1);
}

#[test]
fn single_var_is_one_var_token() {
    let (tokens, pools, _arena) = tokenize_str("x");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(tokens[0], Token::Var(0)));
    assert_eq!(pools.vars.unwrap().count(), 1);
}

#[test]
fn repeated_var_reuses_its_slot() {
    let (tokens, pools, _arena) = tokenize_str("x+x");
    assert_eq!(tokens.len(), 3);
    assert!(matches!(tokens[0], Token::Var(0)));
    assert!(matches!(tokens[2], Token::Var(0)));
    assert_eq!(pools.vars.unwrap().count(), 1);
}

#[test]
fn binary_op_between_two_ints() {
    let (tokens, _pools, _arena) = tokenize_str("3+4");
    assert_eq!(tokens.len(), 3);
    assert!(matches!(tokens[0], Token::Const(0)));
    assert!(matches!(tokens[1], Token::Op(op) if OPS[op as usize] == b'+'));
    assert!(matches!(tokens[2], Token::Const(1)));
}

#[test]
fn unary_op_prefixes_an_operand() {
    let (tokens, _pools, _arena) = tokenize_str("#1 2 3");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(tokens[0], Token::Op(op) if OPS[op as usize] == b'#'));
}

#[test]
fn assignment_uses_colon() {
    let (tokens, _pools, _arena) = tokenize_str("x:1");
    assert_eq!(tokens.len(), 3);
    assert!(matches!(tokens[1], Token::Op(op) if OPS[op as usize] == b':'));
}

#[test]
fn string_literal_is_a_const() {
    let (tokens, pools, _arena) = tokenize_str("\"hi\"");
    assert_eq!(tokens.len(), 1);
    let Token::Const(idx) = tokens[0] else {
        panic!("expected const")
    };
    let consts = pools.consts.unwrap();
    let aplk_core::Value::Heap(s) = consts.slice::<aplk_core::Value>()[idx as usize] else {
        panic!("expected heap string")
    };
    assert_eq!(s.slice::<u8>(), b"hi");
}

#[test]
fn whitespace_between_tokens_is_skipped() {
    let (tokens, _pools, _arena) = tokenize_str("  3   +   4  ");
    assert_eq!(tokens.len(), 3);
}

#[test]
fn unclosed_string_is_a_parse_error() {
    let mut arena = Arena::new();
    let mut pools = Pools::default();
    let err = tokenize(&mut arena, &mut pools, "\"abc").unwrap_err();
    assert_eq!(err.kind, crate::error::KErrorKind::Parse);
}

#[test]
fn empty_string_literal_is_a_parse_error() {
    let mut arena = Arena::new();
    let mut pools = Pools::default();
    let err = tokenize(&mut arena, &mut pools, "\"\"").unwrap_err();
    assert_eq!(err.kind, crate::error::KErrorKind::Parse);
}

#[test]
fn invalid_character_is_a_parse_error() {
    let mut arena = Arena::new();
    let mut pools = Pools::default();
    let err = tokenize(&mut arena, &mut pools, "1'2").unwrap_err();
    assert_eq!(err.kind, crate::error::KErrorKind::Parse);
}
