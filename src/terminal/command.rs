use std::fmt::Display;

use crate::{
    parse_position,
    terminal::parse::{ParseError, ParseResult, Token, TokenIterator},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Everything a player can type at the turn prompt
pub enum Command {
    /// Places a permanent mark
    ///
    /// Usage: (classic can be substituted with `c` or `1`)
    /// classic             # Ask for the square
    /// classic [square]    # Mark `square`
    Classic(Option<usize>),

    /// Places a mark in superposition across two squares
    ///
    /// Usage: (quantum can be substituted with `q` or `2`)
    /// quantum                 # Ask for both squares
    /// quantum [sq1] [sq2]     # Split between `sq1` and `sq2`
    Quantum(Option<usize>, Option<usize>),

    /// Spends the player's collapse for this game
    ///
    /// Usage: (collapse can be substituted with `m` or `3`)
    Collapse,

    /// Redraws the board
    Board,

    /// Prints every gate issued so far
    Circuit,

    /// Usage: (help can be substituted with `h` or `?`)
    Help,

    /// Abandons the current game
    ///
    /// Usage: (quit can be substituted with `exit` or `4`)
    Quit,
}
impl Command {
    pub fn parse_tokens(tokens: TokenIterator<'_>) -> ParseResult<Self> {
        let mut tokens = tokens;
        let command = CommandIdent::parse_command(&mut tokens)?;
        let parsed = match command {
            CommandIdent::Classic => Command::Classic(Self::next_position(&mut tokens)?),
            CommandIdent::Quantum => Command::Quantum(
                Self::next_position(&mut tokens)?,
                Self::next_position(&mut tokens)?,
            ),
            CommandIdent::Collapse => Command::Collapse,
            CommandIdent::Board => Command::Board,
            CommandIdent::Circuit => Command::Circuit,
            CommandIdent::Help => Command::Help,
            CommandIdent::Quit => Command::Quit,
        };

        if let Some(token) = tokens.next() {
            return Err(ParseError::UnexpectedArgument(token.into()));
        }
        Ok(parsed)
    }

    fn next_position(tokens: &mut TokenIterator<'_>) -> ParseResult<Option<usize>> {
        tokens.next().map(|t| parse_position!(t)).transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Differs from Command since Identifier does
/// not carry any information about arguments
pub enum CommandIdent {
    /// classic, c or 1
    Classic,
    /// quantum, q or 2
    Quantum,
    /// collapse, m or 3
    Collapse,
    /// quit, exit or 4
    Quit,
    /// board or b
    Board,
    /// circuit
    Circuit,
    /// help, h or ?
    Help,
}
impl CommandIdent {
    pub fn parse_command(tokens: &mut TokenIterator<'_>) -> ParseResult<Self> {
        let token = tokens
            .next()
            .ok_or(ParseError::ExpectedCommand("Nothing".into()))?;
        Self::try_from(token)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CommandIdent::Classic => "classic",
            CommandIdent::Quantum => "quantum",
            CommandIdent::Collapse => "collapse",
            CommandIdent::Quit => "quit",
            CommandIdent::Board => "board",
            CommandIdent::Circuit => "circuit",
            CommandIdent::Help => "help",
        }
    }
}
impl TryFrom<Token<'_>> for CommandIdent {
    type Error = ParseError;

    fn try_from(value: Token) -> ParseResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "classic" | "c" | "1" => Ok(Self::Classic),
            "quantum" | "q" | "2" => Ok(Self::Quantum),
            "collapse" | "m" | "3" => Ok(Self::Collapse),
            "quit" | "exit" | "4" => Ok(Self::Quit),
            "board" | "b" => Ok(Self::Board),
            "circuit" => Ok(Self::Circuit),
            "help" | "h" | "?" => Ok(Self::Help),
            _ => Err(ParseError::ExpectedCommand(value.into())),
        }
    }
}
impl Display for CommandIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
