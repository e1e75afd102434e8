use super::dispatch::{Dispatcher, Flow};
use crate::engine::Loader;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Feed `input` to the dispatcher line by line until EOF or a quit command.
pub fn run<L, W, R>(dispatcher: &mut Dispatcher<L, W>, input: R, prefix: char) -> Result<Flow>
where
    L: Loader,
    W: Write + Send,
    R: BufRead,
{
    dispatcher.prompt()?;
    for line in input.lines() {
        let line = line.context("Failed to read console input")?;
        if dispatcher.handle_line(&line, prefix)? == Flow::Quit {
            return Ok(Flow::Quit);
        }
        dispatcher.prompt()?;
    }
    Ok(Flow::Continue)
}
