//! Device actions - the structured decision a transcript resolves to
//!
//! On the wire an action is `{"type": "POWER", "value": "ON"}`. In memory it
//! is a closed enum, so a POWER action can only ever carry ON or OFF.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown value '{value}' for action type {kind}")]
    InvalidValue { kind: ActionType, value: String },

    #[error("action type {0} requires a value")]
    MissingValue(ActionType),

    #[error("action type UNKNOWN takes no value, got '{0}'")]
    UnexpectedValue(String),
}

/// Action category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Power,
    Brightness,
    Color,
    Model,
    Unknown,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Power => write!(f, "POWER"),
            ActionType::Brightness => write!(f, "BRIGHTNESS"),
            ActionType::Color => write!(f, "COLOR"),
            ActionType::Model => write!(f, "MODEL"),
            ActionType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Power {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Brightness {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Green,
    Red,
    White,
    Yellow,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Change,
}

/// A device-control action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub enum Action {
    Power(Power),
    Brightness(Brightness),
    Color(Color),
    Model(Model),
    /// Nothing matched
    Unknown,
}

impl Action {
    pub fn kind(&self) -> ActionType {
        match self {
            Action::Power(_) => ActionType::Power,
            Action::Brightness(_) => ActionType::Brightness,
            Action::Color(_) => ActionType::Color,
            Action::Model(_) => ActionType::Model,
            Action::Unknown => ActionType::Unknown,
        }
    }

    /// Payload as it appears on the wire, `None` for UNKNOWN
    pub fn value(&self) -> Option<&'static str> {
        let value = match self {
            Action::Power(Power::On) => "ON",
            Action::Power(Power::Off) => "OFF",
            Action::Brightness(Brightness::Up) => "UP",
            Action::Brightness(Brightness::Down) => "DOWN",
            Action::Color(Color::Blue) => "BLUE",
            Action::Color(Color::Green) => "GREEN",
            Action::Color(Color::Red) => "RED",
            Action::Color(Color::White) => "WHITE",
            Action::Color(Color::Yellow) => "YELLOW",
            Action::Color(Color::Purple) => "PURPLE",
            Action::Model(Model::Change) => "CHANGE",
            Action::Unknown => return None,
        };
        Some(value)
    }

    /// Build an action from its wire form, rejecting combinations that
    /// don't belong to the category.
    pub fn parse(kind: ActionType, value: Option<&str>) -> Result<Self, ActionError> {
        let Some(value) = value else {
            return match kind {
                ActionType::Unknown => Ok(Action::Unknown),
                kind => Err(ActionError::MissingValue(kind)),
            };
        };

        let action = match (kind, value) {
            (ActionType::Power, "ON") => Action::Power(Power::On),
            (ActionType::Power, "OFF") => Action::Power(Power::Off),
            (ActionType::Brightness, "UP") => Action::Brightness(Brightness::Up),
            (ActionType::Brightness, "DOWN") => Action::Brightness(Brightness::Down),
            (ActionType::Color, "BLUE") => Action::Color(Color::Blue),
            (ActionType::Color, "GREEN") => Action::Color(Color::Green),
            (ActionType::Color, "RED") => Action::Color(Color::Red),
            (ActionType::Color, "WHITE") => Action::Color(Color::White),
            (ActionType::Color, "YELLOW") => Action::Color(Color::Yellow),
            (ActionType::Color, "PURPLE") => Action::Color(Color::Purple),
            (ActionType::Model, "CHANGE") => Action::Model(Model::Change),
            (ActionType::Unknown, value) => {
                return Err(ActionError::UnexpectedValue(value.to_string()));
            }
            (kind, value) => {
                return Err(ActionError::InvalidValue {
                    kind,
                    value: value.to_string(),
                });
            }
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) => write!(f, "{}:{}", self.kind(), value),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// Wire shape of an action
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: ActionType,
    value: Option<String>,
}

impl TryFrom<RawAction> for Action {
    type Error = ActionError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        Action::parse(raw.kind, raw.value.as_deref())
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        Self {
            kind: action.kind(),
            value: action.value().map(String::from),
        }
    }
}
