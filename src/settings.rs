//! Generator settings and their validation.
//!
//! Every field has a default, and TOML profiles use `#[serde(default)]` so
//! they only list the values that differ.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::expr::ExprConfig;
use crate::stmt::StmtConfig;
use crate::weighted::WeightedChoice;
use crate::words;

/// The statement productions that can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Empty,
    LocalVar,
    Expression,
    If,
    While,
    Return,
    Block,
}

impl StatementKind {
    pub const ALL: [StatementKind; 7] = [
        StatementKind::Empty,
        StatementKind::LocalVar,
        StatementKind::Expression,
        StatementKind::If,
        StatementKind::While,
        StatementKind::Return,
        StatementKind::Block,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Empty => "empty",
            StatementKind::LocalVar => "local_var",
            StatementKind::Expression => "expression",
            StatementKind::If => "if",
            StatementKind::While => "while",
            StatementKind::Return => "return",
            StatementKind::Block => "block",
        }
    }

    /// `if`, `while` and nested blocks.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            StatementKind::If | StatementKind::While | StatementKind::Block
        )
    }
}

/// A statement kind with its relative weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedStatementKind {
    pub kind: StatementKind,
    pub weight: f64,
}

impl WeightedStatementKind {
    pub const fn new(kind: StatementKind, weight: f64) -> Self {
        Self { kind, weight }
    }
}

/// All knobs of program synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Probability that a class member is a field rather than a method.
    pub field_to_method_ratio: f64,
    /// Probability that a declared type is wrapped in an array.
    pub array_type_percentage: f64,
    /// Upper bound of the target identifier length.
    pub approximate_name_length: usize,
    pub max_type_members: usize,
    /// Classes per program are drawn from `1..=max_types`.
    pub max_types: usize,
    pub max_parameters: usize,
    pub max_statements_per_block: usize,
    /// Chance to add one more thrown marker type to a method.
    pub thrown_type_probability: f64,
    /// Whether one class receives `public static void main(String[] args)`.
    pub entry_point: bool,
    pub statement_weights: Vec<WeightedStatementKind>,
    pub expr: ExprConfig,
    pub stmt: StmtConfig,
    /// Words identifiers are built from. Supplied at runtime, not by profiles.
    #[serde(skip)]
    pub words: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_to_method_ratio: 0.3,
            array_type_percentage: 0.15,
            approximate_name_length: 20,
            max_type_members: 30,
            max_types: 40,
            max_parameters: 7,
            max_statements_per_block: 10,
            thrown_type_probability: 0.1,
            entry_point: true,
            statement_weights: default_statement_weights(),
            expr: ExprConfig::default(),
            stmt: StmtConfig::default(),
            words: words::default_words(),
        }
    }
}

/// Default relative frequency of each statement kind.
pub fn default_statement_weights() -> Vec<WeightedStatementKind> {
    use StatementKind::*;
    vec![
        WeightedStatementKind::new(Empty, 0.05),
        WeightedStatementKind::new(LocalVar, 0.3),
        WeightedStatementKind::new(Expression, 0.3),
        WeightedStatementKind::new(If, 0.1),
        WeightedStatementKind::new(While, 0.08),
        WeightedStatementKind::new(Return, 0.06),
        WeightedStatementKind::new(Block, 0.07),
    ]
}

/// Fail unless `value` lies in `[0, 1]`.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

/// Fail when `value` exceeds `max`.
pub(crate) fn check_cap(name: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::AboveCap { name, value, max })
    }
}

impl Settings {
    /// Check every setting. Synthesis refuses to start on error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.words.is_empty() {
            return Err(ConfigError::EmptyWordList);
        }
        if let Some(index) = self.words.iter().position(|w| w.is_empty()) {
            return Err(ConfigError::EmptyWord { index });
        }
        if self.max_types == 0 {
            return Err(ConfigError::NoTypes);
        }
        if self.approximate_name_length == 0 {
            return Err(ConfigError::ZeroNameLength);
        }
        check_probability("field_to_method_ratio", self.field_to_method_ratio)?;
        check_probability("array_type_percentage", self.array_type_percentage)?;
        check_probability("thrown_type_probability", self.thrown_type_probability)?;
        self.expr.validate()?;
        self.stmt.validate()?;
        self.statement_sampler()?;
        Ok(())
    }

    /// Build the sampler over the configured statement kinds.
    pub fn statement_sampler(&self) -> Result<WeightedChoice<StatementKind>, ConfigError> {
        if self.statement_weights.is_empty() {
            return Err(ConfigError::NoStatementKinds);
        }
        WeightedChoice::new(
            self.statement_weights.iter().map(|w| (w.weight, w.kind)),
            |kind| kind.as_str().to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn empty_word_list_rejected() {
        let settings = Settings {
            words: Vec::new(),
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::EmptyWordList));
    }

    #[test]
    fn empty_word_rejected() {
        let settings = Settings {
            words: vec!["tree".into(), String::new()],
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::EmptyWord { index: 1 }));
    }

    #[test]
    fn no_statement_kinds_rejected() {
        let settings = Settings {
            statement_weights: Vec::new(),
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::NoStatementKinds));
    }

    #[test]
    fn zero_total_weight_rejected() {
        let settings = Settings {
            statement_weights: vec![WeightedStatementKind::new(StatementKind::Empty, 0.0)],
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonPositiveTotalWeight { .. })
        ));
    }

    #[test]
    fn overflowing_weights_rejected_before_synthesis() {
        let settings = Settings {
            statement_weights: vec![
                WeightedStatementKind::new(StatementKind::Empty, 1e308),
                WeightedStatementKind::new(StatementKind::LocalVar, 1e308),
            ],
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonFiniteTotalWeight { .. })
        ));
    }

    #[test]
    fn zero_max_types_rejected() {
        let settings = Settings {
            max_types: 0,
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::NoTypes));
    }

    #[test]
    fn probability_out_of_range_rejected() {
        let settings = Settings {
            array_type_percentage: 1.2,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::InvalidProbability {
                name: "array_type_percentage",
                value: 1.2
            })
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            max_types = 3

            [[statement_weights]]
            kind = "local_var"
            weight = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.max_types, 3);
        assert_eq!(settings.max_parameters, 7);
        assert_eq!(settings.statement_weights.len(), 1);
        assert_eq!(settings.statement_weights[0].kind, StatementKind::LocalVar);
        assert!(!settings.words.is_empty());
    }

    #[test]
    fn statement_kind_names_round_trip_through_serde() {
        for kind in StatementKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
