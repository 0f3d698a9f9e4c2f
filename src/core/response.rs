use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SearchError};

/// Shown when a response would otherwise be empty
pub const NO_RESULTS: &str = "No results...";

/// Item or modifier argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    String(String),
    Array(Vec<String>),
    Nested(BTreeMap<String, Argument>),
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::String(s.to_string())
    }
}

impl From<String> for Argument {
    fn from(s: String) -> Self {
        Argument::String(s)
    }
}

/// How the launcher interprets an icon path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconType {
    Fileicon,
    Filetype,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub path: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IconType>,
}

impl Icon {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), kind: None }
    }

    pub fn config() -> Self {
        Self::new("images/icons/workflow.config.png")
    }

    pub fn config_dir() -> Self {
        Self::new("images/icons/workflow.config.dir.png")
    }

    pub fn info() -> Self {
        Self::new("images/icons/info.png")
    }

    pub fn failure() -> Self {
        Self::new("images/icons/failure.png")
    }
}

/// Copy / large type text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub largetype: Option<String>,
}

/// Alternate action while a modifier key is held.
///
/// `subtitle` and `icon` are always emitted; `null` keeps the launcher from
/// inheriting the parent item's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub arg: Argument,
    pub subtitle: Option<String>,
    pub valid: bool,
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
}

impl Default for Modifier {
    fn default() -> Self {
        Self {
            arg: Argument::String(String::new()),
            subtitle: None,
            valid: true,
            icon: None,
            variables: None,
        }
    }
}

impl Modifier {
    pub fn new(arg: impl Into<Argument>, subtitle: impl Into<String>) -> Self {
        Self {
            arg: arg.into(),
            subtitle: Some(subtitle.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mods {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctrl: Option<Modifier>,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<Modifier>,
    #[serde(rename = "cmd+shift", default, skip_serializing_if = "Option::is_none")]
    pub cmd_shift: Option<Modifier>,
    #[serde(rename = "cmd+alt", default, skip_serializing_if = "Option::is_none")]
    pub cmd_alt: Option<Modifier>,
    #[serde(rename = "alt+shift", default, skip_serializing_if = "Option::is_none")]
    pub alt_shift: Option<Modifier>,
    #[serde(rename = "ctrl+shift", default, skip_serializing_if = "Option::is_none")]
    pub ctrl_shift: Option<Modifier>,
}

impl Mods {
    pub fn is_empty(&self) -> bool {
        self.cmd.is_none()
            && self.alt.is_none()
            && self.shift.is_none()
            && self.ctrl.is_none()
            && self.function.is_none()
            && self.cmd_shift.is_none()
            && self.cmd_alt.is_none()
            && self.alt_shift.is_none()
            && self.ctrl_shift.is_none()
    }
}

/// One row in the launcher's result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default = "default_valid")]
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<Argument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quicklookurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Mods::is_empty")]
    pub mods: Mods,
}

fn default_valid() -> bool {
    true
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            valid: true,
            uid: None,
            arg: None,
            icon: None,
            text: None,
            autocomplete: None,
            quicklookurl: None,
            variables: None,
            mods: Mods::default(),
        }
    }

    /// Set or overwrite a single item variable
    pub fn add_variable(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
    }
}

/// Script filter response written to stdout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerun: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipknowledge: Option<bool>,
}

impl Response {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Informational single-item response
    pub fn info(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self::message(title.into(), subtitle.into(), Icon::info())
    }

    /// Failure single-item response
    pub fn failure(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self::message(title.into(), subtitle.into(), Icon::failure())
    }

    fn message(title: String, subtitle: String, icon: Icon) -> Self {
        let text = format!("{}. {}", title, subtitle);
        let mut item = Item::new(title.clone());
        item.subtitle = subtitle;
        item.arg = Some(Argument::String(title));
        item.text = Some(Text {
            copy: Some(text.clone()),
            largetype: Some(text),
        });
        item.icon = Some(icon);
        Self::new(vec![item])
    }

    /// Render an error for the launcher
    pub fn from_error(err: &SearchError) -> Self {
        match err {
            SearchError::UnknownSearch(_) | SearchError::InvalidAction(_) => {
                Self::info(err.to_string(), "")
            }
            _ => Self::failure(err.to_string(), ""),
        }
    }

    /// Pretty JSON as the launcher expects it.
    /// An empty item list becomes a single "No results..." row.
    pub fn encoded(&self) -> Result<String> {
        let mut response = self.clone();
        response.skipknowledge = Some(true);

        if response.items.is_empty() {
            let mut item = Item::new(NO_RESULTS);
            item.icon = Some(Icon::info());
            item.valid = false;
            response.items.push(item);
        }

        Ok(serde_json::to_string_pretty(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn to_value(response: &Response) -> Value {
        serde_json::from_str(&response.encoded().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_response_gets_placeholder() {
        let mut response = Response::default();
        response.variables = Some(BTreeMap::from([("mode".to_string(), "x".to_string())]));

        let json = to_value(&response);
        assert_eq!(json["items"][0]["title"], NO_RESULTS);
        assert_eq!(json["items"][0]["valid"], false);
        assert_eq!(json["items"][0]["icon"]["path"], "images/icons/info.png");
        assert_eq!(json["variables"]["mode"], "x");
        assert_eq!(json["skipknowledge"], true);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let json = to_value(&Response::new(vec![Item::new("Google")]));
        let item = json["items"][0].as_object().unwrap();

        assert_eq!(item["title"], "Google");
        assert_eq!(item["subtitle"], "");
        assert_eq!(item["valid"], true);
        assert!(!item.contains_key("arg"));
        assert!(!item.contains_key("mods"));
        assert!(!item.contains_key("variables"));
        assert!(json.get("rerun").is_none());
    }

    #[test]
    fn test_modifier_keys() {
        let mut item = Item::new("GitHub");
        item.mods.shift = Some(Modifier::new("https://github.com", "Shorthand: gh"));
        item.mods.cmd_shift = Some(Modifier::default());

        let json = to_value(&Response::new(vec![item]));
        let mods = &json["items"][0]["mods"];
        assert_eq!(mods["shift"]["subtitle"], "Shorthand: gh");
        assert_eq!(mods["shift"]["icon"], Value::Null);
        assert_eq!(mods["cmd+shift"]["arg"], "");
        assert_eq!(mods["cmd+shift"]["subtitle"], Value::Null);
        assert!(mods.get("cmd").is_none());
    }

    #[test]
    fn test_message_responses() {
        let response = Response::failure("Boom", "details");
        let item = &response.items[0];
        assert_eq!(item.arg, Some(Argument::from("Boom")));
        assert_eq!(item.text.as_ref().unwrap().copy.as_deref(), Some("Boom. details"));
        assert_eq!(item.icon, Some(Icon::failure()));

        let response = Response::from_error(&SearchError::UnknownSearch("Bing".into()));
        assert_eq!(response.items[0].icon, Some(Icon::info()));
        assert_eq!(response.items[0].title, "Unable to find web search named: Bing");
    }

    #[test]
    fn test_argument_untagged() {
        let nested: Argument = serde_json::from_str(r#"{"trigger": "open_url"}"#).unwrap();
        assert!(matches!(nested, Argument::Nested(ref map) if map.contains_key("trigger")));

        let array: Argument = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(array, Argument::Array(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_add_variable() {
        let mut item = Item::new("Configure");
        item.add_variable("trigger", "config");
        item.add_variable("trigger", "open_url");
        item.add_variable("token", "valid");

        let vars = item.variables.unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["trigger"], "open_url");
    }

    #[test]
    fn test_roundtrip_item_with_mods() {
        let mut item = Item::new("Maps");
        item.mods.alt = Some(Modifier::new("https://maps.example", "https://maps.example"));
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
