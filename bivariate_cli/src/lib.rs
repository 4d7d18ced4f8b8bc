//! Line-oriented front end for the worked comparison examples.
//!
//! Each input line is one command. Commands produce [`Output`] values, which the binary prints;
//! keeping rendering out of [`Session`] lets the tests inspect results directly.
pub mod table;

use bivariate_engine::likelihood::{elo_win_probability, greater_than};
use bivariate_engine::{
    DiscreteDistribution, JointTable, ProbabilityError, Support, Variable,
};
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::table::Table;

pub const HELP: &str = "\
Commands:
  heights              Posterior heights of A and B after learning that A is taller.
  heights given <a>    Distribution of B's height given A's height, after the same update.
  chess                Posterior Elo ratings of A and B after A beats B.
  table heights|chess  Posterior marginals as a table of percentages.
  joint heights|chess  Posterior joint table as CSV.
  set <name> <value>   Change a setting.
  settings             List the settings.
  help                 Show this message.";

#[derive(Debug, Clone)]
pub enum Output {
    Distribution {
        name: String,
        distribution: DiscreteDistribution,
    },
    Table(Table),
    Text(String),
}

/// Priors for the two worked examples. Both variables share the same prior, a normal density
/// discretized on `[mean - span, mean + span)` with spacing `step`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub height_mean: f64,
    pub height_std: f64,
    pub height_step: f64,
    pub height_span: f64,
    pub elo_mean: f64,
    pub elo_std: f64,
    pub elo_step: f64,
    pub elo_span: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            height_mean: 178.0,
            height_std: 7.7,
            height_step: 0.5,
            height_span: 24.0,
            elo_mean: 1600.0,
            elo_std: 100.0,
            elo_step: 10.0,
            elo_span: 300.0,
        }
    }
}

impl Settings {
    const NAMES: [&'static str; 8] = [
        "height_mean",
        "height_std",
        "height_step",
        "height_span",
        "elo_mean",
        "elo_std",
        "elo_step",
        "elo_span",
    ];

    fn get_mut(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "height_mean" => Some(&mut self.height_mean),
            "height_std" => Some(&mut self.height_std),
            "height_step" => Some(&mut self.height_step),
            "height_span" => Some(&mut self.height_span),
            "elo_mean" => Some(&mut self.elo_mean),
            "elo_std" => Some(&mut self.elo_std),
            "elo_step" => Some(&mut self.elo_step),
            "elo_span" => Some(&mut self.elo_span),
            _ => None,
        }
    }

    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "height_mean" => Some(self.height_mean),
            "height_std" => Some(self.height_std),
            "height_step" => Some(self.height_step),
            "height_span" => Some(self.height_span),
            "elo_mean" => Some(self.elo_mean),
            "elo_std" => Some(self.elo_std),
            "elo_step" => Some(self.elo_step),
            "elo_span" => Some(self.elo_span),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Heights,
    Chess,
}

impl Scenario {
    fn labels(self) -> (&'static str, &'static str) {
        match self {
            Scenario::Heights => ("A", "B"),
            Scenario::Chess => ("A (winner)", "B (loser)"),
        }
    }
}

/// The result of running a scenario: the joint posterior and the probability of the evidence.
#[derive(Debug, Clone)]
pub struct Inference {
    pub posterior: JointTable,
    pub evidence: f64,
}

#[derive(Debug, Default)]
pub struct Session {
    settings: Settings,
}

/// A whitespace-separated word of the input line, with its byte offset.
#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    start: usize,
}

impl Token<'_> {
    fn span(&self) -> SourceSpan {
        (self.start, self.text.len()).into()
    }
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                tokens.push(Token {
                    text: &line[s..i],
                    start: s,
                });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            text: &line[s..],
            start: s,
        });
    }
    tokens
}

fn end_span(line: &str) -> SourceSpan {
    (line.len(), 0).into()
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs one line of input.
    pub fn execute(&mut self, line: &str) -> Result<Vec<Output>, CommandError> {
        let tokens = tokenize(line);
        let Some((command, args)) = tokens.split_first() else {
            return Ok(Vec::new());
        };
        tracing::debug!(command = command.text, args = args.len(), "executing command");
        match command.text {
            "heights" => match args {
                [] => self.summary(Scenario::Heights),
                [given, value] if given.text == "given" => self.heights_given(*value),
                [given, _, extra, ..] if given.text == "given" => {
                    Err(CommandError::UnexpectedArgument {
                        range: extra.span(),
                    })
                }
                [given] if given.text == "given" => Err(CommandError::MissingArgument {
                    range: end_span(line),
                    expected: "a height for A",
                }),
                [other, ..] => Err(CommandError::UnexpectedArgument {
                    range: other.span(),
                }),
            },
            "chess" => {
                expect_no_more(args, 0)?;
                self.summary(Scenario::Chess)
            }
            "table" => {
                let scenario = scenario_argument(line, args)?;
                let inference = self.infer(scenario)?;
                let (first_label, second_label) = scenario.labels();
                let first = inference.posterior.marginal(Variable::First);
                let second = inference.posterior.marginal(Variable::Second);
                Ok(vec![Output::Table(Table::from_distributions(&[
                    (first_label, &first),
                    (second_label, &second),
                ]))])
            }
            "joint" => {
                let scenario = scenario_argument(line, args)?;
                let inference = self.infer(scenario)?;
                Ok(vec![Output::Text(bivariate_engine::output::export_joint_csv(
                    &inference.posterior,
                ))])
            }
            "set" => self.set(line, args),
            "settings" => {
                expect_no_more(args, 0)?;
                Ok(vec![Output::Text(self.describe_settings())])
            }
            "help" => Ok(vec![Output::Text(HELP.to_string())]),
            _ => Err(CommandError::UnknownCommand {
                range: command.span(),
                name: command.text.to_string(),
            }),
        }
    }

    fn prior(
        mean: f64,
        std: f64,
        step: f64,
        span: f64,
    ) -> Result<DiscreteDistribution, ProbabilityError> {
        let support = Support::range(mean - span, mean + span, step)?;
        DiscreteDistribution::normal(support, mean, std)
    }

    /// Builds the joint prior for a scenario and updates it with that scenario's evidence.
    pub fn infer(&self, scenario: Scenario) -> Result<Inference, ProbabilityError> {
        let s = &self.settings;
        let prior = match scenario {
            Scenario::Heights => {
                Self::prior(s.height_mean, s.height_std, s.height_step, s.height_span)?
            }
            Scenario::Chess => Self::prior(s.elo_mean, s.elo_std, s.elo_step, s.elo_span)?,
        };
        let joint = JointTable::build(&prior, &prior)?;
        let likelihood = match scenario {
            Scenario::Heights => joint.likelihood(greater_than)?,
            Scenario::Chess => joint.likelihood(|x, y| elo_win_probability(x - y))?,
        };
        let (posterior, evidence) = joint.update(&likelihood)?;
        Ok(Inference {
            posterior,
            evidence,
        })
    }

    fn summary(&self, scenario: Scenario) -> Result<Vec<Output>, CommandError> {
        let inference = self.infer(scenario)?;
        let (first_label, second_label) = scenario.labels();
        Ok(vec![
            Output::Text(format!("Probability of the evidence: {}", inference.evidence)),
            Output::Distribution {
                name: first_label.to_string(),
                distribution: inference.posterior.marginal(Variable::First),
            },
            Output::Distribution {
                name: second_label.to_string(),
                distribution: inference.posterior.marginal(Variable::Second),
            },
        ])
    }

    fn heights_given(&self, value: Token<'_>) -> Result<Vec<Output>, CommandError> {
        let a = parse_number(value)?;
        let inference = self.infer(Scenario::Heights)?;
        let distribution = inference
            .posterior
            .conditional(Variable::First, a)
            .map_err(|source| CommandError::Condition {
                range: value.span(),
                source,
            })?;
        Ok(vec![Output::Distribution {
            name: format!("B | A = {}", a),
            distribution,
        }])
    }

    fn set(&mut self, line: &str, args: &[Token<'_>]) -> Result<Vec<Output>, CommandError> {
        let (name, value) = match args {
            [name, value] => (name, value),
            [_, _, extra, ..] => {
                return Err(CommandError::UnexpectedArgument {
                    range: extra.span(),
                });
            }
            [_] => {
                return Err(CommandError::MissingArgument {
                    range: end_span(line),
                    expected: "a value",
                })
            }
            [] => {
                return Err(CommandError::MissingArgument {
                    range: end_span(line),
                    expected: "a setting name",
                })
            }
        };
        let slot = self
            .settings
            .get_mut(name.text)
            .ok_or_else(|| CommandError::UnknownSetting {
                range: name.span(),
                name: name.text.to_string(),
            })?;
        let number = parse_number(*value)?;
        // Means may be any finite number; everything else scales or spaces the grid.
        if !number.is_finite() || (!name.text.ends_with("_mean") && number <= 0.0) {
            return Err(CommandError::InvalidSetting {
                range: value.span(),
                name: name.text.to_string(),
                value: number,
            });
        }
        *slot = number;
        tracing::info!(setting = name.text, value = number, "setting changed");
        Ok(vec![Output::Text(format!("{} = {}", name.text, number))])
    }

    fn describe_settings(&self) -> String {
        Settings::NAMES
            .iter()
            .filter_map(|name| self.settings.get(name).map(|value| format!("{} = {}", name, value)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_number(token: Token<'_>) -> Result<f64, CommandError> {
    token
        .text
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidNumber {
            range: token.span(),
            text: token.text.to_string(),
        })
}

fn expect_no_more(args: &[Token<'_>], allowed: usize) -> Result<(), CommandError> {
    match args.get(allowed) {
        Some(extra) => Err(CommandError::UnexpectedArgument {
            range: extra.span(),
        }),
        None => Ok(()),
    }
}

fn scenario_argument(line: &str, args: &[Token<'_>]) -> Result<Scenario, CommandError> {
    let token = args.first().ok_or_else(|| CommandError::MissingArgument {
        range: end_span(line),
        expected: "`heights` or `chess`",
    })?;
    expect_no_more(args, 1)?;
    match token.text {
        "heights" => Ok(Scenario::Heights),
        "chess" => Ok(Scenario::Chess),
        other => Err(CommandError::UnknownScenario {
            range: token.span(),
            name: other.to_string(),
        }),
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum CommandError {
    #[error("Unknown command [{name}]")]
    #[diagnostic(help("Type `help` to list the commands."))]
    UnknownCommand {
        #[label = "Not a command"]
        range: SourceSpan,
        name: String,
    },

    #[error("Missing argument")]
    MissingArgument {
        #[label = "Expected {expected}"]
        range: SourceSpan,
        expected: &'static str,
    },

    #[error("Unexpected argument")]
    UnexpectedArgument {
        #[label = "Nothing was expected here"]
        range: SourceSpan,
    },

    #[error("Invalid number [{text}]")]
    InvalidNumber {
        #[label = "Not a number"]
        range: SourceSpan,
        text: String,
    },

    #[error("Unknown setting [{name}]")]
    #[diagnostic(help("Type `settings` to list the settings."))]
    UnknownSetting {
        #[label = "No setting with this name"]
        range: SourceSpan,
        name: String,
    },

    #[error("Invalid value {value} for [{name}]")]
    #[diagnostic(help("Means must be finite; standard deviations, steps and spans must be positive."))]
    InvalidSetting {
        #[label = "Not allowed here"]
        range: SourceSpan,
        name: String,
        value: f64,
    },

    #[error("Unknown scenario [{name}]")]
    #[diagnostic(help("The scenarios are `heights` and `chess`."))]
    UnknownScenario {
        #[label = "Not a scenario"]
        range: SourceSpan,
        name: String,
    },

    #[error("Cannot condition on this value")]
    Condition {
        #[label = "{source}"]
        range: SourceSpan,
        #[source]
        #[diagnostic_source]
        source: ProbabilityError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Probability(#[from] ProbabilityError),
}
