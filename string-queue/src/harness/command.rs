use anyhow::{anyhow, bail, Context};
use clap::ValueEnum;

use crate::order::Order;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    New,
    Free,
    InsertHead { value: String, count: usize },
    InsertTail { value: String, count: usize },
    RemoveHead { expected: Option<String> },
    RemoveHeadQuiet,
    Reverse,
    Sort,
    Size { expected: Option<usize> },
    Show,
    Set(Setting),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Setting {
    /// Capacity of the buffer `rh` removes into.
    Length(usize),
    /// Node limit for queues created afterwards; `none` lifts it.
    Limit(Option<usize>),
    Order(Order),
}

pub const HELP: &str = "\
new                 create a new queue
free                delete the queue
ih STR [N]          insert STR at head N times (default 1)
it STR [N]          insert STR at tail N times (default 1)
rh [STR]            remove from head, optionally checking the value is STR
rhq                 remove from head without reporting the value
reverse             reverse the queue
sort                sort the queue
size [N]            report the size, optionally checking it is N
show                display the queue
option length N     set the removal buffer capacity
option limit N|none set the node limit for new queues
option order ORDER  compare with bytewise or natural order
help                show this text
quit                exit";

struct Words<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Words<'a> {
    fn next_string(&mut self) -> Option<String> {
        self.inner.next().map(str::to_owned)
    }

    fn expect_string(&mut self, what: &str) -> anyhow::Result<String> {
        self.next_string()
            .ok_or_else(|| anyhow!("Expected {what} but found None"))
    }

    fn next_number(&mut self, what: &str) -> anyhow::Result<Option<usize>> {
        self.inner
            .next()
            .map(|word| {
                word.parse()
                    .with_context(|| format!("Failed to parse {what} from {word}"))
            })
            .transpose()
    }

    fn finish(mut self) -> anyhow::Result<()> {
        match self.inner.next() {
            Some(extra) => bail!("Unexpected argument {extra}"),
            None => Ok(()),
        }
    }
}

impl Command {
    /// Parses one script line. Blank lines and `#` comments yield `None`; a
    /// comment starts at a word beginning with `#`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = strip_comment(line);
        let mut words = Words {
            inner: line.split_whitespace(),
        };
        let Some(name) = words.next_string() else {
            return Ok(None);
        };

        let command = match name.as_str() {
            "new" => Command::New,
            "free" => Command::Free,
            "ih" | "it" => {
                let value = words.expect_string("a value to insert")?;
                let count = words.next_number("a repeat count")?.unwrap_or(1);
                if name == "ih" {
                    Command::InsertHead { value, count }
                } else {
                    Command::InsertTail { value, count }
                }
            }
            "rh" => Command::RemoveHead {
                expected: words.next_string(),
            },
            "rhq" => Command::RemoveHeadQuiet,
            "reverse" => Command::Reverse,
            "sort" => Command::Sort,
            "size" => Command::Size {
                expected: words.next_number("an expected size")?,
            },
            "show" => Command::Show,
            "option" => Command::Set(Setting::parse(&mut words)?),
            "help" => Command::Help,
            "quit" => Command::Quit,
            cmd => bail!("Unknown command {cmd}"),
        };
        words.finish()?;

        Ok(Some(command))
    }
}

fn strip_comment(line: &str) -> &str {
    let start = line
        .char_indices()
        .find(|&(i, c)| {
            c == '#' && line[..i].chars().next_back().map_or(true, char::is_whitespace)
        })
        .map_or(line.len(), |(i, _)| i);
    &line[..start]
}

impl Setting {
    fn parse(words: &mut Words) -> anyhow::Result<Self> {
        let name = words.expect_string("an option name")?;
        let value = words.expect_string("an option value")?;
        match name.as_str() {
            "length" => Ok(Setting::Length(
                value.parse().context("Failed to parse length")?,
            )),
            "limit" if value == "none" => Ok(Setting::Limit(None)),
            "limit" => Ok(Setting::Limit(Some(
                value.parse().context("Failed to parse limit")?,
            ))),
            "order" => Order::from_str(&value, true)
                .map(Setting::Order)
                .map_err(|err| anyhow!("Unknown order {value}: {err}")),
            other => bail!("Unknown option {other}"),
        }
    }
}
