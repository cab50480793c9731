// Copyright (c) 2018 Fabian Schuiki

//! The token model: terminals, ε, and nonterminals as signed integer
//! handles.
//!
//! Tokens carry caller-chosen numeric identities. Strictly negative values
//! are terminals, the distinguished value 0 is ε, and strictly positive
//! values are nonterminals. The integer ordering is what the classification
//! predicates build on.

use std::fmt;

use crate::grammar::Grammar;
use crate::Pretty;

/// A token handle.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(i32);

/// The ε token, denoting the empty derivation.
pub const EPSILON: Token = Token(0);

impl Token {
    /// Create a token from its numeric identity.
    pub fn from_i32(id: i32) -> Token {
        Token(id)
    }

    /// Obtain the numeric identity of the token.
    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// Check whether the token is a terminal.
    pub fn is_terminal(self) -> bool {
        self.0 < 0
    }

    /// Check whether the token is ε.
    pub fn is_epsilon(self) -> bool {
        self.0 == 0
    }

    /// Check whether the token is a nonterminal.
    pub fn is_nonterminal(self) -> bool {
        self.0 > 0
    }

    /// Refine the token into a terminal, if it is one.
    pub fn as_terminal(self) -> Option<Terminal> {
        if self.is_terminal() {
            Some(Terminal(self.0))
        } else {
            None
        }
    }

    /// Refine the token into a nonterminal, if it is one.
    pub fn as_nonterminal(self) -> Option<Nonterminal> {
        if self.is_nonterminal() {
            Some(Nonterminal(self.0))
        } else {
            None
        }
    }

    /// Get a pretty printer for this token.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "t{}", -(self.0 as i64))
        } else if self.0 == 0 {
            write!(f, "ε")
        } else {
            write!(f, "nt{}", self.0)
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, Token> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.ctx.token_name(self.item) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.item),
        }
    }
}

/// A token known to denote a terminal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Terminal(i32);

/// The default end-of-input terminal.
///
/// The builder uses this identity unless the caller picks another terminal
/// via `set_eof_token`.
pub const END: Terminal = Terminal(-1);

impl Terminal {
    /// Create a terminal from its numeric identity.
    pub fn from_i32(id: i32) -> Terminal {
        Terminal(id)
    }

    /// Obtain the numeric identity of the terminal.
    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// Obtain the token for this terminal.
    pub fn token(self) -> Token {
        Token(self.0)
    }

    /// Get a pretty printer for this terminal.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl From<Terminal> for Token {
    fn from(term: Terminal) -> Token {
        Token(term.0)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "t{}", -(self.0 as i64))
    }
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, Terminal> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.ctx.terminal_name(self.item) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.item),
        }
    }
}

/// A token known to denote a nonterminal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonterminal(i32);

impl Nonterminal {
    /// Create a nonterminal from its numeric identity.
    pub fn from_i32(id: i32) -> Nonterminal {
        Nonterminal(id)
    }

    /// Obtain the numeric identity of the nonterminal.
    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// Obtain the token for this nonterminal.
    pub fn token(self) -> Token {
        Token(self.0)
    }

    /// Get a pretty printer for this nonterminal.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl From<Nonterminal> for Token {
    fn from(nonterm: Nonterminal) -> Token {
        Token(nonterm.0)
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "nt{}", self.0)
    }
}

impl fmt::Debug for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, Nonterminal> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.ctx.nonterminal_name(self.item) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.item),
        }
    }
}
