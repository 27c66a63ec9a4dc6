//! A line-oriented command interpreter that drives a [`Queue`].

use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use log::{debug, error};

use crate::{handle, order::Order, queue::Queue};

pub use command::{Command, Setting, HELP};

mod command;

pub const DEFAULT_LENGTH: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Capacity of the buffer a removed value is copied into.
    pub length: usize,
    pub limit: Option<usize>,
    pub order: Order,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            limit: None,
            order: Order::default(),
        }
    }
}

enum Flow {
    Continue(String),
    Quit,
}

#[derive(Debug, Default)]
pub struct Harness {
    queue: Option<Queue>,
    config: Config,
}

impl Harness {
    pub fn new(config: Config) -> Self {
        Self {
            queue: None,
            config,
        }
    }

    pub fn queue(&self) -> Option<&Queue> {
        self.queue.as_ref()
    }

    /// Runs every command in `input`, echoing each and writing its result to
    /// `out`. A failing command is reported and the run carries on.
    ///
    /// Returns the number of commands that failed.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<usize> {
        let mut failures = 0;
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    error!("{err:#}");
                    writeln!(out, "cmd> {}\nERROR: {err:#}", line.trim())?;
                    failures += 1;
                    continue;
                }
            };

            writeln!(out, "cmd> {}", line.trim())?;
            match self.execute(command) {
                Ok(Flow::Continue(output)) => writeln!(out, "{output}")?,
                Ok(Flow::Quit) => break,
                Err(err) => {
                    error!("{err:#}");
                    writeln!(out, "ERROR: {err:#}")?;
                    failures += 1;
                }
            }
        }

        handle::destroy(self.queue.take());
        Ok(failures)
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        debug!("Executing command: {command:?}");
        let output = match command {
            Command::New => {
                handle::destroy(self.queue.take());
                self.queue = Some(match self.config.limit {
                    Some(limit) => Queue::with_limit(limit),
                    None => handle::create(),
                });
                self.show()
            }
            Command::Free => {
                handle::destroy(self.queue.take());
                self.show()
            }
            Command::InsertHead { value, count } => {
                for _ in 0..count {
                    handle::insert_front(self.queue.as_mut(), &value)
                        .with_context(|| format!("Failed to insert {value} at head"))?;
                }
                self.show()
            }
            Command::InsertTail { value, count } => {
                for _ in 0..count {
                    handle::insert_back(self.queue.as_mut(), &value)
                        .with_context(|| format!("Failed to insert {value} at tail"))?;
                }
                self.show()
            }
            Command::RemoveHead { expected } => {
                let mut buf = Vec::new();
                buf.try_reserve_exact(self.config.length)
                    .context("Failed to allocate removal buffer")?;
                buf.resize(self.config.length, 0u8);
                handle::remove_front(self.queue.as_mut(), Some(&mut buf))
                    .context("Failed to remove from head")?;
                let end = buf.iter().position(|&byte| byte == 0).unwrap_or(buf.len());
                let removed = String::from_utf8_lossy(&buf[..end]);
                if let Some(expected) = expected {
                    if removed != expected.as_str() {
                        bail!("Removed value {removed} from queue, expected {expected}");
                    }
                }
                format!("Removed {removed} from queue\n{}", self.show())
            }
            Command::RemoveHeadQuiet => {
                handle::remove_front(self.queue.as_mut(), None)
                    .context("Failed to remove from head")?;
                self.show()
            }
            Command::Reverse => {
                handle::reverse(self.queue.as_mut());
                self.show()
            }
            Command::Sort => {
                handle::sort_by(self.queue.as_mut(), self.config.order.less());
                if let Some(queue) = &self.queue {
                    let mut values = queue.iter();
                    if let Some(mut previous) = values.next() {
                        for value in values {
                            if self.config.order.less()(value, previous) {
                                bail!("Queue not sorted: {previous} comes before {value}");
                            }
                            previous = value;
                        }
                    }
                }
                self.show()
            }
            Command::Size { expected } => {
                let size = handle::size(self.queue.as_ref());
                if let Some(expected) = expected {
                    if size != expected {
                        bail!("Computed queue size as {size}, but expected {expected}");
                    }
                }
                format!("Queue size = {size}")
            }
            Command::Show => self.show(),
            Command::Set(setting) => {
                match setting {
                    Setting::Length(length) => self.config.length = length,
                    Setting::Limit(limit) => self.config.limit = limit,
                    Setting::Order(order) => self.config.order = order,
                }
                format!("{:?}", self.config)
            }
            Command::Help => HELP.to_owned(),
            Command::Quit => return Ok(Flow::Quit),
        };

        Ok(Flow::Continue(output))
    }

    fn show(&self) -> String {
        match &self.queue {
            Some(queue) => format!("q = {queue}"),
            None => "q = NULL".to_owned(),
        }
    }
}
