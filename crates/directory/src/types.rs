//! Request and response shapes exchanged with the project directory.

use populator_core::{IssueId, LabelId, OptionId, OwnerId, ProjectId, RemoteField};
use serde::{Deserialize, Serialize};

/// Which kind of account owns projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerKind {
    User,
    Organization,
}

impl OwnerKind {
    /// GraphQL root field for this owner kind.
    pub fn root_field(&self) -> &'static str {
        match self {
            OwnerKind::User => "user",
            OwnerKind::Organization => "organization",
        }
    }
}

impl std::fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.root_field())
    }
}

/// A resolved project owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerIdentity {
    /// Owner node id
    pub id: OwnerId,
    /// Login
    pub login: String,
    /// Account kind the login resolved as
    pub kind: OwnerKind,
}

/// A repository label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLabel {
    /// Label id
    pub id: LabelId,
    /// Label name
    pub name: String,
}

/// An existing project and its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProject {
    /// Project id
    pub id: ProjectId,
    /// Project number
    pub number: u64,
    /// Title
    pub title: String,
    /// Board URL
    pub url: String,
    /// Custom and built-in fields
    pub fields: Vec<RemoteField>,
}

/// A freshly created project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedProject {
    /// Project id
    pub id: ProjectId,
    /// Assigned project number
    pub number: u64,
    /// Board URL
    pub url: String,
}

/// A freshly created issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Issue node id
    pub id: IssueId,
    /// Issue number
    pub number: u64,
    /// Issue URL
    pub url: String,
}

/// Colors available for single-select options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionColor {
    Gray,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    Pink,
    Purple,
}

impl OptionColor {
    /// Fixed palette cycled through by option position.
    pub const PALETTE: [OptionColor; 8] = [
        OptionColor::Gray,
        OptionColor::Blue,
        OptionColor::Green,
        OptionColor::Yellow,
        OptionColor::Orange,
        OptionColor::Red,
        OptionColor::Pink,
        OptionColor::Purple,
    ];

    /// Color for the option at `position`.
    pub fn for_position(position: usize) -> Self {
        Self::PALETTE[position % Self::PALETTE.len()]
    }
}

/// A single-select option to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionInput {
    /// Option name
    pub name: String,
    /// Option color
    pub color: OptionColor,
    /// Option description
    pub description: String,
}

impl OptionInput {
    /// Build inputs for `names`, cycling the palette by position.
    pub fn from_names(names: &[String]) -> Vec<Self> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| OptionInput {
                name: name.clone(),
                color: OptionColor::for_position(i),
                description: String::new(),
            })
            .collect()
    }
}

/// A value to write into an item field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldValueInput {
    /// Single-select option
    #[serde(rename = "singleSelectOptionId")]
    SingleSelect(OptionId),
    /// Number
    #[serde(rename = "number")]
    Number(f64),
    /// Text
    #[serde(rename = "text")]
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles_every_eight_options() {
        assert_eq!(OptionColor::for_position(0), OptionColor::Gray);
        assert_eq!(OptionColor::for_position(7), OptionColor::Purple);
        assert_eq!(OptionColor::for_position(8), OptionColor::Gray);
        assert_eq!(OptionColor::for_position(10), OptionColor::Green);
    }

    #[test]
    fn option_inputs_keep_order_and_colors() {
        let names: Vec<String> = (0..9).map(|i| format!("opt{}", i)).collect();
        let inputs = OptionInput::from_names(&names);
        assert_eq!(inputs.len(), 9);
        assert_eq!(inputs[1].color, OptionColor::Blue);
        assert_eq!(inputs[8].name, "opt8");
        assert_eq!(inputs[8].color, OptionColor::Gray);
    }

    #[test]
    fn field_values_serialize_as_graphql_input() {
        let value = FieldValueInput::SingleSelect(OptionId::new("opt"));
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!({"singleSelectOptionId": "opt"})
        );
        assert_eq!(
            serde_json::to_value(FieldValueInput::Number(2.5)).unwrap(),
            serde_json::json!({"number": 2.5})
        );
        assert_eq!(
            serde_json::to_value(OptionColor::Purple).unwrap(),
            serde_json::json!("PURPLE")
        );
    }
}
