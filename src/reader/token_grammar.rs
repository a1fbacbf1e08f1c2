//! PEG grammar for splitting input lines into whitespace separated tokens.
//!
//! This module is an internal implementation detail of [`TokenReader`](super::TokenReader).

peg::parser!{pub grammar grammar() for str {

rule space() = [c if c.is_whitespace()]

rule token() -> &'input str
	= s:$([c if !c.is_whitespace()]+) { s }

/// Splits a whole line into its tokens, ignoring leading and trailing whitespace.
pub rule tokens() -> Vec<&'input str>
	= space()* t:(token() ** (space()+)) space()* { t }

/// Accepts `true` or `false` in any letter case.
pub rule boolean() -> bool
	= s:$([_]+) {?
		if s.eq_ignore_ascii_case("true") {
			Ok(true)
		} else if s.eq_ignore_ascii_case("false") {
			Ok(false)
		} else {
			Err("boolean")
		}
	}

}}

#[cfg(test)]
mod tests {
    use super::grammar as g;
    macro_rules! assert_ok {
        ($e:expr) => (
            match $e {
                Ok(obj) => (obj),
                Err(e) => panic!("{}", e),
            }
        );
        ($e:expr , $o:expr) => (
            let obj = assert_ok!($e);
            assert_eq!(obj, $o);
        );
    }
    macro_rules! assert_err {
        ($e:expr) => (
            let result = $e;
            assert!(result.is_err());
        );
    }
    #[test]
    fn tokens_ok() {
        assert_ok!(g::tokens("this is a test"), vec!["this", "is", "a", "test"]);
        assert_ok!(g::tokens("  42\t43   -44 "), vec!["42", "43", "-44"]);
        assert_ok!(g::tokens("single"), vec!["single"]);
    }
    #[test]
    fn tokens_blank_ok() {
        assert_ok!(g::tokens(""), Vec::<&str>::new());
        assert_ok!(g::tokens("   \t "), Vec::<&str>::new());
    }
    #[test]
    fn tokens_unicode_whitespace_ok() {
        assert_ok!(g::tokens("a\u{00A0}b"), vec!["a", "b"]);
    }
    #[test]
    fn boolean_ok() {
        assert_ok!(g::boolean("true"), true);
        assert_ok!(g::boolean("TRUE"), true);
        assert_ok!(g::boolean("False"), false);
    }
    #[test]
    fn boolean_err() {
        assert_err!(g::boolean("yes"));
        assert_err!(g::boolean("truex"));
        assert_err!(g::boolean("1"));
        assert_err!(g::boolean(""));
    }
}
