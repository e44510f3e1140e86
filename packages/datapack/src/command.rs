//! Command text construction.
//!
//! A command is a sequence of parts joined by spaces when the line is
//! rendered. Parts stay as values until then, so a part may be a lazy
//! forward reference (a function not yet finalized) or a structured
//! payload rendered inline as compound-tag text.

use packforge_codec::{to_plain_text, CodecError};
use packforge_model::{Lazy, Model, Value};

/// A command line under construction.
///
/// # Example
///
/// ```rust
/// use packforge_datapack::{Command, Target};
///
/// let line = Command::new("tell").arg(Target::executor()).arg("some thing");
/// assert_eq!(line.render().unwrap(), "tell @s some thing");
/// ```
#[derive(Clone, Debug)]
pub struct Command {
    parts: Vec<Value>,
}

impl Command {
    pub fn new(head: impl Into<Value>) -> Self {
        Command {
            parts: vec![head.into()],
        }
    }

    /// Append a part. Builder style, so lines read left to right.
    #[must_use]
    pub fn arg(mut self, part: impl Into<Value>) -> Self {
        self.parts.push(part.into());
        self
    }

    /// Render the line: parts space-joined, lazy parts resolved.
    pub fn render(&self) -> Result<String, CodecError> {
        to_plain_text(&Value::Array(self.parts.clone()))
    }
}

impl From<Command> for Value {
    fn from(cmd: Command) -> Value {
        Value::Array(cmd.parts)
    }
}

/// `say <message>`.
pub fn say(message: impl Into<Value>) -> Command {
    Command::new("say").arg(message)
}

/// `tell <target> <message>`.
pub fn tell(target: impl Into<Value>, message: impl Into<Value>) -> Command {
    Command::new("tell").arg(target).arg(message)
}

/// `give <target> <item>`.
pub fn give(target: impl Into<Value>, item: impl Into<Value>) -> Command {
    Command::new("give").arg(target).arg(item)
}

/// A target selector: `@a`, `@e[type=item]`, `@s[scores={menu=1..}]`.
///
/// Arguments render lazily when the selector's command line renders, so an
/// `nbt` payload keeps tracking its model until materialization.
#[derive(Clone, Debug)]
pub struct Target {
    selector: &'static str,
    args: Vec<(String, Value)>,
    scores: Vec<(String, String)>,
}

impl Target {
    pub fn all_players() -> Self {
        Target::with_selector("@a")
    }

    pub fn nearest_player() -> Self {
        Target::with_selector("@p")
    }

    pub fn random_player() -> Self {
        Target::with_selector("@r")
    }

    /// The executing entity, `@s`.
    pub fn executor() -> Self {
        Target::with_selector("@s")
    }

    pub fn all_entities() -> Self {
        Target::with_selector("@e")
    }

    fn with_selector(selector: &'static str) -> Self {
        Target {
            selector,
            args: Vec::new(),
            scores: Vec::new(),
        }
    }

    /// Append a raw selector argument.
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.push((key.into(), value.into()));
        self
    }

    /// Filter by entity type.
    #[must_use]
    pub fn entity_type(self, ty: impl Into<Value>) -> Self {
        self.arg("type", ty)
    }

    /// Filter by a structured data payload, rendered as compound-tag text
    /// from the model's state at render time.
    #[must_use]
    pub fn nbt(self, model: &Model) -> Self {
        let model = model.clone();
        self.arg("nbt", Value::Lazy(Lazy::computed(move || model.dump())))
    }

    /// Filter by a scoreboard range, e.g. `scores("menu", "1..")`.
    #[must_use]
    pub fn scores(mut self, objective: impl Into<String>, range: impl Into<String>) -> Self {
        self.scores.push((objective.into(), range.into()));
        self
    }

    /// Render the selector text.
    pub fn render(&self) -> Result<String, CodecError> {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        for (key, value) in &self.args {
            args.push(format!("{}={}", key, to_plain_text(value)?));
        }
        if !self.scores.is_empty() {
            let pairs: Vec<String> = self
                .scores
                .iter()
                .map(|(obj, range)| format!("{}={}", obj, range))
                .collect();
            args.push(format!("scores={{{}}}", pairs.join(",")));
        }
        if args.is_empty() {
            Ok(self.selector.to_string())
        } else {
            Ok(format!("{}[{}]", self.selector, args.join(",")))
        }
    }
}

impl From<Target> for Value {
    fn from(target: Target) -> Value {
        // An argument that fails to render resolves to Null here and
        // resurfaces as an encoding error when the command line renders.
        Value::Lazy(Lazy::computed(move || match target.render() {
            Ok(text) => Value::String(text),
            Err(_) => Value::Null,
        }))
    }
}
