// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Three-pass compiler: bracket reduction, postfix (bracket-call) reduction,
//! then right-to-left recursive-descent bytecode emission.
//!
//! The language has no operator precedence: evaluation is right-to-left and
//! every operator is right-associative, so `1+2*3` means `1+(2*3)`. This is
//! implemented directly as a right-recursive grammar rather than the
//! original's emit-then-reverse byte trick; the two produce the same
//! bytecode shape.

use std::collections::BTreeSet;

use aplk_core::{Arena, HeapRef, TypeCode, Value};

use crate::bytecode::{
    class_of, index_of, opcode, OP_BINARY, OP_CONST, OP_ENLIST, OP_GET_VAR, OP_N_ARY, OP_POP,
    OP_SET_VAR, OP_UNARY,
};
use crate::error::KError;
use crate::reader::{self, Pools, Token, OPS};

/// An element of a bracket-reduced expression: either a still-raw token
/// (`Const`/`Var`/`Op` only — brackets and `;` are resolved before this
/// point) or an already-compiled sub-program spliced in as a single value.
enum Elem {
    Tok(Token),
    Code(Vec<u8>),
}

fn colon_index() -> u8 {
    OPS.iter().position(|&c| c == b':').expect("':' is in OPS") as u8
}

fn operand_code(elem: &Elem) -> Result<Vec<u8>, KError> {
    match elem {
        Elem::Tok(Token::Const(idx)) => Ok(vec![opcode(OP_CONST, *idx)]),
        Elem::Tok(Token::Var(idx)) => Ok(vec![opcode(OP_GET_VAR, *idx)]),
        Elem::Code(code) => Ok(code.clone()),
        _ => unreachable!("brackets/semicolons are resolved before operand_code runs"),
    }
}

fn is_value_elem(e: &Elem) -> bool {
    matches!(
        e,
        Elem::Code(_) | Elem::Tok(Token::Const(_)) | Elem::Tok(Token::Var(_))
    )
}

/// Find the index of the token whose combined paren/bracket nesting returns
/// to the level just before `open_idx` (i.e. the matching close).
fn find_matching(tokens: &[Token], open_idx: usize) -> Result<usize, KError> {
    let mut depth = 0i32;
    for (i, t) in tokens.iter().enumerate().skip(open_idx) {
        match t {
            Token::LParen | Token::LBracket => depth += 1,
            Token::RParen | Token::RBracket => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return Ok(i);
        }
    }
    Err(KError::parse("unclosed bracket", open_idx))
}

fn split_top_level_semi(tokens: &[Token]) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, t) in tokens.iter().enumerate() {
        match t {
            Token::LParen | Token::LBracket => depth += 1,
            Token::RParen | Token::RBracket => depth -= 1,
            Token::Semi if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// Bracket reduction: replaces every `(...)` group with its compiled value
/// and every `head[...]` postfix run with a compiled n-ary application,
/// leaving only bare `Const`/`Var`/`Op` tokens and spliced-in `Code` blocks.
fn reduce(tokens: &[Token]) -> Result<Vec<Elem>, KError> {
    let mut elems = Vec::new();
    let mut i = 0usize;
    while i < tokens.len() {
        match tokens[i] {
            Token::LParen => {
                let close = find_matching(tokens, i)?;
                let segments = split_top_level_semi(&tokens[i + 1..close]);
                let inner = if segments.len() == 1 && segments[0].is_empty() {
                    // `()`: the empty list literal.
                    vec![OP_ENLIST, 0]
                } else if segments.len() == 1 {
                    compile_tokens(segments[0])?
                } else {
                    // List literal: emit each sub-expression's code in
                    // reverse segment order, then enlist(n) to rebuild the
                    // original order from the popped values.
                    let mut code = Vec::new();
                    for seg in segments.iter().rev() {
                        code.extend(compile_tokens(seg)?);
                    }
                    code.push(OP_ENLIST);
                    code.push(segments.len() as u8);
                    code
                };
                elems.push(Elem::Code(inner));
                i = close + 1;
            }
            Token::LBracket => {
                let close = find_matching(tokens, i)?;
                let arg_slices = split_top_level_semi(&tokens[i + 1..close]);
                let mut arg_codes = Vec::with_capacity(arg_slices.len());
                for slice in &arg_slices {
                    arg_codes.push(compile_tokens(slice)?);
                }
                match elems.last() {
                    Some(base) if is_value_elem(base) => {
                        let base = elems.pop().expect("just matched Some above");
                        let mut code = operand_code(&base)?;
                        for arg in &arg_codes {
                            code.extend(arg.iter().copied());
                        }
                        code.push(opcode(OP_N_ARY, arg_codes.len() as u8));
                        elems.push(Elem::Code(code));
                    }
                    _ => {
                        // No preceding value: a bare `[a;b;c]` grouping,
                        // sequenced like top-level statements.
                        let mut code = Vec::new();
                        for (k, arg) in arg_codes.iter().enumerate() {
                            code.extend(arg.iter().copied());
                            if k + 1 < arg_codes.len() {
                                code.push(opcode(OP_POP, 0));
                            }
                        }
                        elems.push(Elem::Code(code));
                    }
                }
                i = close + 1;
            }
            Token::Semi => return Err(KError::parse("unexpected ';'", i)),
            Token::RParen | Token::RBracket => {
                return Err(KError::parse("unmatched bracket", i));
            }
            other => {
                elems.push(Elem::Tok(other));
                i += 1;
            }
        }
    }
    Ok(elems)
}

/// Right-to-left, right-associative, no-precedence bytecode emission over a
/// bracket-reduced element sequence.
fn rpn_emit(elems: &[Elem]) -> Result<Vec<u8>, KError> {
    if elems.is_empty() {
        return Err(KError::parse("empty expression", 0));
    }
    // `var : rest` — assignment binds outermost, like everything else here.
    if elems.len() >= 2 {
        if let (Elem::Tok(Token::Var(vidx)), Elem::Tok(Token::Op(op))) = (&elems[0], &elems[1]) {
            if *op == colon_index() {
                let mut code = rpn_emit(&elems[2..])?;
                code.push(opcode(OP_SET_VAR, *vidx));
                return Ok(code);
            }
        }
    }
    // Unary prefix: operator applies to everything after it.
    if let Elem::Tok(Token::Op(op_idx)) = &elems[0] {
        let mut code = rpn_emit(&elems[1..])?;
        code.push(opcode(OP_UNARY, *op_idx));
        return Ok(code);
    }
    if elems.len() == 1 {
        return operand_code(&elems[0]);
    }
    // `value op rest` — infix, right-associative.
    if let Elem::Tok(Token::Op(op_idx)) = &elems[1] {
        let left = operand_code(&elems[0])?;
        let right = rpn_emit(&elems[2..])?;
        let mut code = left;
        code.extend(right);
        code.push(opcode(OP_BINARY, *op_idx));
        return Ok(code);
    }
    Err(KError::parse("expected an operator between values", 0))
}

/// Compile a flat token slice (no statement separators at the top level of
/// the caller's choosing — e.g. a whole line, or one `(...)`/`[...]`
/// interior) into bytecode, sequencing any top-level `;`-separated
/// statements with `OP_POP`.
fn compile_tokens(tokens: &[Token]) -> Result<Vec<u8>, KError> {
    let statements = split_top_level_semi(tokens);
    let mut out = Vec::new();
    let mut first = true;
    for stmt in &statements {
        if stmt.is_empty() {
            continue;
        }
        if !first {
            out.push(opcode(OP_POP, 0));
        }
        first = false;
        let elems = reduce(stmt)?;
        out.extend(rpn_emit(&elems)?);
    }
    if out.is_empty() {
        return Err(KError::parse("empty expression", 0));
    }
    Ok(out)
}

/// Tokenize and compile one source line into bytecode, threading `pools`
/// for constant/variable resolution.
pub fn compile(arena: &mut Arena, pools: &mut Pools, src: &str) -> Result<Vec<u8>, KError> {
    let tokens = reader::tokenize(arena, pools, src)?;
    compile_tokens(&tokens)
}

/// Compile a `{[params]body}` lambda literal starting at `bytes[start] == '{'`,
/// returning the heap-allocated `Lambda` record and the index just past its
/// closing `}`.
pub(crate) fn compile_lambda(
    arena: &mut Arena,
    bytes: &[u8],
    start: usize,
) -> Result<(Value, usize), KError> {
    let close = find_matching_brace(bytes, start)?;
    let body = &bytes[start + 1..close];
    let mut cursor = 0usize;
    let mut params: Vec<u32> = Vec::new();
    if cursor < body.len() && body[cursor] == b'[' {
        let end = body[cursor..]
            .iter()
            .position(|&b| b == b']')
            .map(|p| p + cursor)
            .ok_or_else(|| KError::parse("unclosed lambda parameter list", start))?;
        for name in body[cursor + 1..end].split(|&b| b == b';') {
            if !name.is_empty() {
                params.push(aplk_core::encode_sym(name));
            }
        }
        cursor = end + 1;
    }
    let body_src = std::str::from_utf8(&body[cursor..]).unwrap_or("");

    let mut pools = Pools::default();
    for &p in &params {
        pools.add_var(arena, p);
    }
    let mut bytecode = compile(arena, &mut pools, body_src)?;

    // A variable index is a genuine local (parameter, or a name first bound
    // by an in-body assignment); any other name referenced is a free
    // variable resolved against the global dict at call time. Locals are
    // packed to the front of the vars pool so the VM can tell them apart
    // from a single `varc` cutoff.
    let total = pools.vars.map_or(0, HeapRef::count) as usize;
    let assigned = assigned_var_indices(&bytecode);
    let (remap, varc) = locals_remap(params.len(), total, &assigned);
    apply_remap(&mut bytecode, &remap);
    if let Some(old_vars) = pools.vars {
        pools.vars = Some(reorder_vars(arena, old_vars, &remap));
    }

    let bc_vec = arena.knew(TypeCode::Chr, bytecode.len() as i32);
    unsafe { core::ptr::copy_nonoverlapping(bytecode.as_ptr(), bc_vec.as_ptr(), bytecode.len()) };

    let vars_value = pools.vars.map_or(Value::nil(), Value::Heap);
    let consts_value = pools.consts.map_or(Value::nil(), Value::Heap);

    let src_vec = arena.knew(TypeCode::Chr, body.len() as i32);
    if !body.is_empty() {
        unsafe { core::ptr::copy_nonoverlapping(body.as_ptr(), src_vec.as_ptr(), body.len()) };
    }

    let lambda = arena.knew(TypeCode::Lambda, 4);
    lambda.header_mut().argc = params.len() as u8;
    lambda.header_mut().varc = varc as u8;
    unsafe {
        lambda.set_elem(0, Value::Heap(bc_vec));
        lambda.set_elem(1, vars_value);
        lambda.set_elem(2, consts_value);
        lambda.set_elem(3, Value::Heap(src_vec));
    }
    Ok((Value::Heap(lambda), close + 1))
}

/// Every distinct variable index that is ever the target of an assignment
/// in `code`.
fn assigned_var_indices(code: &[u8]) -> BTreeSet<u8> {
    code.iter()
        .copied()
        .filter(|&b| class_of(b) == OP_SET_VAR)
        .map(index_of)
        .collect()
}

/// Build the old-index -> new-index permutation that packs locals
/// (parameters, then any assigned-in-body name) into `0..varc`, with any
/// remaining free-variable names packed into `varc..total`.
fn locals_remap(argc: usize, total: usize, assigned: &BTreeSet<u8>) -> (Vec<u8>, usize) {
    let mut locals: Vec<u8> = (0..argc as u8).collect();
    for &a in assigned {
        if !locals.contains(&a) {
            locals.push(a);
        }
    }
    locals.sort_unstable();
    let varc = locals.len();

    let free: Vec<u8> = (0..total as u8).filter(|i| !locals.contains(i)).collect();

    let mut remap = vec![0u8; total];
    for (new_idx, &old_idx) in locals.iter().chain(free.iter()).enumerate() {
        remap[old_idx as usize] = new_idx as u8;
    }
    (remap, varc)
}

/// Rewrite every `GET_VAR`/`SET_VAR` operand in `code` through `remap`.
fn apply_remap(code: &mut [u8], remap: &[u8]) {
    for b in code.iter_mut() {
        let class = class_of(*b);
        if class == OP_GET_VAR || class == OP_SET_VAR {
            *b = opcode(class, remap[index_of(*b) as usize]);
        }
    }
}

/// Physically reorder a Sym vector's entries through `remap`.
fn reorder_vars(arena: &mut Arena, vars: HeapRef, remap: &[u8]) -> HeapRef {
    let old_syms = vars.slice::<u32>();
    let new_vars = arena.knew(TypeCode::Sym, old_syms.len() as i32);
    for (old_idx, &sym) in old_syms.iter().enumerate() {
        unsafe { new_vars.set_elem(i32::from(remap[old_idx]), sym) };
    }
    new_vars
}

fn find_matching_brace(bytes: &[u8], start: usize) -> Result<usize, KError> {
    let mut depth = 0i32;
    let mut in_string = false;
    for i in start..bytes.len() {
        match bytes[i] {
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(KError::parse("unclosed lambda", start))
}
