//! Interactive collection of a reconciliation request.
//!
//! Each question is repeated until it gets an acceptable answer; rejected
//! answers are explained with the matching [`InputError`] message. Running out
//! of input is the only way out of a question without an answer.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};

use crate::{correspondence::Correspondence, error::InputError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptAnswers {
    pub first_path: PathBuf,
    pub second_path: PathBuf,
    pub first_key: String,
    pub second_key: String,
    pub correspondence: Correspondence,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn collect(&mut self) -> Result<PromptAnswers> {
        let first_path = self.ask_path(
            "Enter the path for the first spreadsheet (e.g., spreadsheets/first.xlsx): ",
        )?;
        let second_path = self.ask_path(
            "Enter the path for the second spreadsheet (e.g., spreadsheets/second.xlsx): ",
        )?;

        writeln!(
            self.output,
            "Choose the column to use as the key. It should identify the same row in both \
             spreadsheets, such as an employee ID or a policy number."
        )?;
        let first_key = self.ask_name(
            "Enter the name of the column containing the keys in the first spreadsheet: ",
        )?;
        let second_key = self.ask_name(
            "Enter the name of the column containing the keys in the second spreadsheet: ",
        )?;

        let same_names = self.ask_parsed(
            "Are the names of the columns the same on both spreadsheets? (yes/no): ",
            parse_yes_no,
        )?;
        let count = self.ask_parsed("Enter the number of columns to compare: ", parse_count)?;

        let mut names_a = Vec::new();
        let mut names_b = Vec::new();
        for position in 1..=count {
            if same_names {
                names_a.push(
                    self.ask_name(&format!("Enter the name of column {position} to compare: "))?,
                );
            } else {
                names_a.push(self.ask_name(&format!(
                    "Enter the name of column {position} you want to compare in the first spreadsheet: "
                ))?);
                names_b.push(self.ask_name(&format!(
                    "Enter the name of column {position} you want to compare in the second spreadsheet: "
                ))?);
            }
        }
        let correspondence = Correspondence::resolve(same_names, &names_a, &names_b)
            .context("Building the column correspondence")?;

        Ok(PromptAnswers {
            first_path,
            second_path,
            first_key,
            second_key,
            correspondence,
        })
    }

    fn ask_line(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Reading answer from input")?;
        if read == 0 {
            bail!("Input ended before all questions were answered");
        }
        Ok(line.trim().to_string())
    }

    fn ask_path(&mut self, question: &str) -> Result<PathBuf> {
        self.ask_parsed(question, |answer| {
            if answer.is_empty() {
                Err(InputError::EmptyPath)
            } else {
                Ok(PathBuf::from(answer))
            }
        })
    }

    fn ask_name(&mut self, question: &str) -> Result<String> {
        self.ask_parsed(question, |answer| {
            if answer.is_empty() {
                Err(InputError::EmptyColumnName)
            } else {
                Ok(answer.to_string())
            }
        })
    }

    fn ask_parsed<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> Result<T> {
        loop {
            let answer = self.ask_line(question)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }
}

pub fn parse_yes_no(answer: &str) -> Result<bool, InputError> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if answer.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(InputError::NotYesNo(answer.to_string()))
    }
}

pub fn parse_count(answer: &str) -> Result<usize, InputError> {
    let answer = answer.trim();
    let value: i64 = answer
        .parse()
        .map_err(|_| InputError::InvalidNumber(answer.to_string()))?;
    if value <= 0 {
        return Err(InputError::NonPositiveCount(value));
    }
    usize::try_from(value).map_err(|_| InputError::InvalidNumber(answer.to_string()))
}
