//! Compilation of set expressions into store command batches.
//!
//! Internal nodes are materialized into short-lived temporaries with the
//! store-side `*STORE` commands, deepest nodes first; the terminal read
//! runs over the root; the temporaries are deleted at the end of the same
//! atomic batch. A single-key expression skips the plan entirely and
//! issues the terminal read directly.

use crate::{
    db::query::SetExpr,
    key::KeySpace,
    store::{Command, Pipeline, Reply, Store, StoreError},
};
use log::trace;

///
/// Terminal
/// Final read issued over the evaluated set.
///

#[derive(Clone, Copy, Debug)]
pub(crate) enum Terminal<'a> {
    Card,
    Members,
    IsMember(&'a str),
}

impl Terminal<'_> {
    fn command(self, key: &str) -> Command {
        match self {
            Self::Card => Command::new("SCARD", [key]),
            Self::Members => Command::new("SMEMBERS", [key]),
            Self::IsMember(id) => Command::new("SISMEMBER", [key, id]),
        }
    }
}

///
/// Plan
///

#[derive(Debug)]
pub(crate) struct Plan {
    commands: Vec<Command>,
    result: usize,
}

impl Plan {
    pub(crate) fn compile(keys: KeySpace<'_>, expr: &SetExpr, terminal: Terminal<'_>) -> Self {
        if let Some(key) = expr.as_key() {
            return Self {
                commands: vec![terminal.command(key)],
                result: 0,
            };
        }

        let mut compiler = Compiler {
            keys,
            commands: Vec::new(),
            temps: Vec::new(),
        };

        let root = compiler.emit(expr);
        let result = compiler.commands.len();

        let mut commands = compiler.commands;
        commands.push(terminal.command(&root));
        commands.push(Command::new("DEL", compiler.temps));

        Self { commands, result }
    }

    /// Run the whole plan as one batch and pull out the terminal's reply.
    pub(crate) fn execute<S: Store>(self, store: &S) -> Result<Reply, StoreError> {
        trace!("finder plan: {} commands", self.commands.len());

        let mut pipeline = Pipeline::new();
        for command in self.commands {
            pipeline.queue(command);
        }

        let mut replies = pipeline.commit(store)?;
        if replies.len() <= self.result {
            return Err(StoreError::new("ERR batch reply was truncated"));
        }

        Ok(replies.swap_remove(self.result))
    }

    #[cfg(test)]
    pub(crate) fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[cfg(test)]
    pub(crate) const fn result_index(&self) -> usize {
        self.result
    }
}

struct Compiler<'a> {
    keys: KeySpace<'a>,
    commands: Vec<Command>,
    temps: Vec<String>,
}

impl Compiler<'_> {
    fn emit(&mut self, expr: &SetExpr) -> String {
        match expr {
            SetExpr::Key(key) => key.clone(),
            SetExpr::Inter(parts) => self.store_node("SINTERSTORE", parts),
            SetExpr::Union(parts) => self.store_node("SUNIONSTORE", parts),
            SetExpr::Diff(parts) => self.store_node("SDIFFSTORE", parts),
        }
    }

    fn store_node(&mut self, op: &'static str, parts: &[SetExpr]) -> String {
        let sources: Vec<String> = parts.iter().map(|part| self.emit(part)).collect();

        let temp = self.keys.temp(self.temps.len());
        self.temps.push(temp.clone());

        if sources.is_empty() {
            // a node with no sources is the empty set, which in store terms
            // is an absent key
            self.commands.push(Command::new("DEL", [temp.clone()]));
        } else {
            let mut args = Vec::with_capacity(sources.len() + 1);
            args.push(temp.clone());
            args.extend(sources);
            self.commands.push(Command::new(op, args));
        }

        temp
    }
}
