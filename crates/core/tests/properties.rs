//! Property-based tests for the tokenizer, the lookahead stream and the parser.

use fgd_core::lexer::{tokenize, TokenKind};
use fgd_core::lookahead::LookaheadStream;
use fgd_core::{parse_all, serialize, NodeKind};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// One source fragment that lexes to exactly one token when followed by trivia.
fn arb_piece() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z_][A-Za-z0-9_]{0,6}",
        // identifiers with path and dash characters inside
        "[a-z][a-z0-9]{0,3}[-./][a-z0-9]{1,3}",
        // digit-led identifiers such as `1st`
        "[0-9]{1,3}[a-z_][a-z0-9_]{0,4}",
        "[0-9]{1,4}",
        "-?[0-9]{1,3}\\.[0-9]{1,2}",
        "-[0-9]{1,3}",
        "-\\.[0-9]{1,2}",
        r#""(?:[a-z ]|\\"){0,8}""#,
        "'[A-Z]{0,4}'",
        prop::sample::select(vec![
            "@", ",", ".", ":", "=", "+", "-", "*", "/", "&", "<", ">", "~", "!", "|", "^", ";",
            "%", "?", "(", ")", "[", "]", "{", "}", "{{", "}}",
        ])
        .prop_map(str::to_owned),
    ]
}

fn arb_trivia() -> impl Strategy<Value = String> {
    prop::sample::select(vec![" ", "\n", "\t", "  ", " // note\n", "\r\n"]).prop_map(str::to_owned)
}

fn arb_source() -> impl Strategy<Value = (String, Vec<String>)> {
    prop::collection::vec((arb_piece(), arb_trivia()), 0..40).prop_map(|parts| {
        let mut src = String::new();
        let mut pieces = Vec::new();
        for (piece, trivia) in parts {
            src.push_str(&piece);
            src.push_str(&trivia);
            pieces.push(piece);
        }
        (src, pieces)
    })
}

fn arb_ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

// ============================================================================
// TOKENIZER
// ============================================================================

proptest! {
    #[test]
    fn token_spans_reconstruct_source((src, pieces) in arb_source()) {
        let tokens = tokenize(&src).unwrap();
        prop_assert_eq!(tokens.len(), pieces.len());
        let mut last_end = 0;
        for (token, piece) in tokens.iter().zip(&pieces) {
            let (start, end) = match token.kind {
                TokenKind::String => (token.span.start - 1, token.span.end + 1),
                _ => (token.span.start, token.span.end),
            };
            prop_assert!(start >= last_end);
            prop_assert_eq!(&src[start..end], piece.as_str());
            last_end = end;
        }
    }

    #[test]
    fn tokenizing_is_deterministic((src, _) in arb_source()) {
        prop_assert_eq!(tokenize(&src), tokenize(&src));
    }
}

// ============================================================================
// LOOKAHEAD STREAM
// ============================================================================

proptest! {
    #[test]
    fn peeking_has_no_side_effects(
        items in prop::collection::vec(any::<u16>(), 0..20),
        size in 1usize..5,
        skip in 0usize..20,
    ) {
        let mut s = LookaheadStream::new(items.clone().into_iter(), size);
        for _ in 0..skip.min(items.len()) {
            s.next();
        }
        for i in 1..=size {
            let first = s.ahead(i).unwrap().copied();
            let second = s.ahead(i).unwrap().copied();
            prop_assert_eq!(first, second);
        }
        let peeked = s.ahead(1).unwrap().copied();
        prop_assert_eq!(s.next(), peeked);
    }

    #[test]
    fn back_undoes_exactly_one_next(
        items in prop::collection::vec(any::<u16>(), 1..20),
        at in 0usize..20,
    ) {
        let at = at % items.len();
        let mut s = LookaheadStream::new(items.clone().into_iter(), 3);
        for _ in 0..at {
            s.next();
        }
        let item = s.next().unwrap();
        s.back(item);
        prop_assert_eq!(s.next(), Some(items[at]));
        let rest: Vec<_> = s.collect();
        prop_assert_eq!(rest, items[at + 1..].to_vec());
    }

    #[test]
    fn behind_reports_recent_history(
        items in prop::collection::vec(any::<u16>(), 0..20),
        consumed in 0usize..20,
        size in 1usize..5,
    ) {
        let consumed = consumed.min(items.len());
        let mut s = LookaheadStream::new(items.clone().into_iter(), size);
        for _ in 0..consumed {
            s.next();
        }
        for i in 1..=size {
            let expected = if i <= consumed { Some(items[consumed - i]) } else { None };
            prop_assert_eq!(s.behind(i).unwrap().copied(), expected);
        }
    }
}

// ============================================================================
// PARSER
// ============================================================================

proptest! {
    #[test]
    fn named_classes_parse_deterministically(
        name in arb_ident(),
        props in prop::collection::vec((arb_ident(), arb_ident(), "[A-Za-z ]{0,12}"), 0..6),
    ) {
        let mut src = format!("@PointClass base(Targetname) = {name} : \"Generated\"\n[\n");
        for (prop, class, title) in &props {
            src.push_str(&format!("    {prop}({class}) : \"{title}\"\n"));
        }
        src.push_str("]\n");

        let first = serialize::document("gen", fgd_core::parse("gen", &src)).unwrap();
        let second = serialize::document("gen", fgd_core::parse("gen", &src)).unwrap();
        prop_assert_eq!(&first, &second);

        let nodes = parse_all("gen", &src).unwrap();
        prop_assert_eq!(nodes.len(), 2);
        let class = nodes[0].class().unwrap();
        prop_assert_eq!(&class.name, &name);
        prop_assert_eq!(class.body.len(), props.len());
        for (decl, (prop, class_name, _)) in class.body.iter().zip(&props) {
            prop_assert_eq!(&decl.name, prop);
            prop_assert_eq!(&decl.class, class_name);
            prop_assert!(decl.span.start < decl.span.end);
            prop_assert!(src[decl.span.start..decl.span.end].starts_with(prop.as_str()));
        }
        let NodeKind::Metadata(meta) = &nodes[1].kind else {
            panic!("metadata node last");
        };
        prop_assert!(meta.classes["pointclass"].contains(&name));
        prop_assert_eq!(nodes[1].span.end, src.len());
    }
}
