//! Function directories and trigger dispatch.
//!
//! A function file is a text leaf: one command per line, first line a
//! comment naming the function. Lines may hold lazy parts, so a function
//! can reference another one created later.

use packforge_model::{Lazy, Path, Value};
use packforge_tree::{TextLeaf, Tree};

use crate::namespaced::{HookKind, Namespaced};
use crate::{Command, PackError};

/// A handle to a created `.mcfunction` file.
///
/// Clones share the same leaf; pushing a line through any handle appends
/// to the same file.
#[derive(Clone, Debug)]
pub struct FunctionRef {
    id: String,
    leaf: TextLeaf,
}

impl FunctionRef {
    /// The fully qualified `namespace:path` identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Append a command line.
    pub fn push(&self, line: impl Into<Value>) -> &Self {
        self.leaf.push_line(line);
        self
    }

    /// Append several command lines.
    pub fn extend<V: Into<Value>>(&self, lines: impl IntoIterator<Item = V>) -> &Self {
        for line in lines {
            self.push(line);
        }
        self
    }

    /// Append a raw span with no trailing newline.
    pub fn append(&self, span: impl Into<Value>) -> &Self {
        self.leaf.append(span);
        self
    }

    /// The `function <id>` command calling this function.
    pub fn call(&self) -> Command {
        Command::new("function").arg(self.id.as_str())
    }
}

/// Ensure the function file `<name>.mcfunction` under `tree`, writing the
/// header comment on first creation. `name` may contain slashes.
pub(crate) fn create_function(
    tree: &Tree,
    namespace: &str,
    prefix: &Path,
    name: &str,
) -> Result<FunctionRef, PackError> {
    let leaf = tree.text(format!("{}.mcfunction", name))?;
    if leaf.is_empty() {
        let short = name.rsplit('/').next().unwrap_or(name);
        leaf.push_line(format!("# function {}", short));
    }
    Ok(FunctionRef {
        id: format!("{}:{}", namespace, prefix.join(name)),
        leaf,
    })
}

/// A namespace directory holding function files.
#[derive(Clone, Debug)]
pub struct FunctionDir {
    ns: Namespaced,
}

impl FunctionDir {
    pub fn new(ns: Namespaced) -> Self {
        FunctionDir { ns }
    }

    pub fn namespaced(&self) -> &Namespaced {
        &self.ns
    }

    /// Descend into a sub-directory; the prefix extends accordingly.
    pub fn dir(&self, path: impl Into<Path>) -> Result<FunctionDir, PackError> {
        Ok(FunctionDir {
            ns: self.ns.dir(path)?,
        })
    }

    /// Ensure the function `name` in this directory. Asking for the same
    /// name twice returns a handle onto the same file.
    pub fn create(&self, name: &str) -> Result<FunctionRef, PackError> {
        create_function(self.ns.tree(), self.ns.namespace(), self.ns.prefix(), name)
    }

    /// Append a line to the namespace's load hook function, creating and
    /// tag-registering it on first use.
    pub fn on_load(&self, line: impl Into<Value>) -> Result<&Self, PackError> {
        self.ns.data().hook(HookKind::Load)?.push(line);
        Ok(self)
    }

    /// Append a line to the namespace's tick hook function.
    pub fn on_tick(&self, line: impl Into<Value>) -> Result<&Self, PackError> {
        self.ns.data().hook(HookKind::Tick)?.push(line);
        Ok(self)
    }

    /// Build a trigger dispatch group over this directory.
    ///
    /// Non-privileged players cannot run `/function`, but they can
    /// `/trigger` a scoreboard objective. The group assigns each of its
    /// functions a trigger slot and emits a per-tick dispatch function
    /// that tests the claimed slots, runs the matching function, then
    /// resets and re-enables the objective.
    pub fn trigger_group(&self, objective: &str) -> Result<TriggerGroup, PackError> {
        TriggerGroup::over(self, objective)
    }
}

/// A dispatch-table builder forked from a [`FunctionDir`].
#[derive(Clone, Debug)]
pub struct TriggerGroup {
    dir: FunctionDir,
}

impl TriggerGroup {
    fn over(parent: &FunctionDir, objective: &str) -> Result<TriggerGroup, PackError> {
        // The fork claims its own slots but shares the parent's tree nodes,
        // so group functions land next to plain ones.
        let ns = parent.ns.fork(true);
        ns.data().set_objective(objective);

        let dispatch = ns.dir(format!("trigger_tree_{}", objective))?;
        let tick = create_function(
            dispatch.tree(),
            dispatch.namespace(),
            dispatch.prefix(),
            "tick",
        )?;

        // The dispatch body depends on every slot claimed anywhere, so it
        // is rendered from the shared state at materialization time.
        let data = ns.data().clone();
        let obj = objective.to_string();
        tick.append(Value::Lazy(Lazy::computed(move || {
            let mut out = String::new();
            for (slot, id) in data.slots() {
                out.push_str(&format!(
                    "execute if entity @s[scores={{{obj}={slot}}}] run function {id}\n"
                ));
            }
            out.push_str(&format!(
                "execute if entity @s[scores={{{obj}=0..}}] run scoreboard players set @s {obj} 0\n"
            ));
            out.push_str(&format!(
                "execute if entity @s[scores={{{obj}=0..}}] run scoreboard players enable @s {obj}\n"
            ));
            Value::String(out)
        })));

        parent.on_load(format!("scoreboard objectives add {} trigger", objective))?;
        parent.on_load(format!("scoreboard players enable @a {}", objective))?;
        parent.on_tick(format!("execute as @a at @s run function {}", tick.id()))?;

        Ok(TriggerGroup {
            dir: FunctionDir::new(ns),
        })
    }

    pub fn objective(&self) -> Result<String, PackError> {
        self.dir.ns.data().objective()
    }

    /// Create a function on the next free trigger slot.
    pub fn create(&self, name: &str) -> Result<(FunctionRef, i64), PackError> {
        self.create_slot(name, None)
    }

    /// Create a function on an explicit trigger slot. A slot already
    /// claimed is a [`PackError::DuplicateSlot`].
    pub fn create_at(&self, name: &str, slot: i64) -> Result<(FunctionRef, i64), PackError> {
        self.create_slot(name, Some(slot))
    }

    fn create_slot(&self, name: &str, slot: Option<i64>) -> Result<(FunctionRef, i64), PackError> {
        let id = self.dir.ns.resource_id(name);
        let slot = self.dir.ns.data().claim_slot(slot, &id)?;
        let func = self.dir.create(name)?;
        Ok((func, slot))
    }

    /// The `trigger <objective> set <slot>` command a player runs to fire
    /// the function on `slot`.
    pub fn trigger(&self, slot: i64) -> Result<Command, PackError> {
        Ok(Command::new("trigger")
            .arg(self.objective()?.as_str())
            .arg("set")
            .arg(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaced::{HookWiring, SharedData};
    use crate::say;
    use packforge_model::Model;
    use packforge_tree::MemoryBackend;

    fn data_root() -> (Tree, FunctionDir) {
        let data_root = Tree::new();
        let data = SharedData::with_wiring(HookWiring::new(data_root.clone(), "some_pack"));
        let tree = data_root.dir("some_pack/functions").unwrap();
        let dir = FunctionDir::new(Namespaced::new("some_pack", tree, data));
        (data_root, dir)
    }

    fn snapshot(tree: &Tree) -> Value {
        let mut backend = MemoryBackend::new();
        tree.materialize(&mut backend).unwrap();
        backend.snapshot()
    }

    #[test]
    fn function_files_carry_a_header() {
        let (data_root, dir) = data_root();
        dir.create("dir/f1").unwrap().push(say("hello"));

        let expected = Model::new();
        expected
            .set(
                "some_pack/functions/dir/f1.mcfunction",
                "# function f1\nsay hello\n",
            )
            .unwrap();
        assert_eq!(snapshot(&data_root), expected.dump());
    }

    #[test]
    fn creating_twice_returns_the_same_file() {
        let (_, dir) = data_root();
        let first = dir.create("f").unwrap();
        let second = dir.create("f").unwrap();
        second.push("say again");

        assert_eq!(first.id(), "some_pack:f");
        // One header, one body line, appended through either handle.
        let mut backend = MemoryBackend::new();
        dir.namespaced().tree().materialize(&mut backend).unwrap();
        let expected = Model::new();
        expected
            .set("f.mcfunction", "# function f\nsay again\n")
            .unwrap();
        assert_eq!(backend.snapshot(), expected.dump());
    }

    #[test]
    fn subdirectories_extend_the_resource_id() {
        let (_, dir) = data_root();
        let f = dir.dir("dir2").unwrap().create("f5").unwrap();
        assert_eq!(f.id(), "some_pack:dir2/f5");
    }

    #[test]
    fn hooks_create_and_register_functions() {
        let (data_root, dir) = data_root();
        dir.on_load("say loaded").unwrap();
        dir.on_load("say more").unwrap();

        let expected = Model::new();
        expected
            .set(
                "some_pack/functions/load.mcfunction",
                "# function load\nsay loaded\nsay more\n",
            )
            .unwrap();
        expected
            .set(
                "minecraft/tags/functions/load.json",
                "{\"values\": [\"some_pack:load\"]}",
            )
            .unwrap();
        assert_eq!(snapshot(&data_root), expected.dump());
    }

    #[test]
    fn trigger_group_dispatches_claimed_slots() {
        let (data_root, dir) = data_root();
        let group = dir.trigger_group("menu").unwrap();

        let (open, open_slot) = group.create("open").unwrap();
        open.push(say("opened"));
        let (_, close_slot) = group.create_at("close", 5).unwrap();

        assert_eq!(open_slot, 1);
        assert_eq!(close_slot, 5);

        let snap = snapshot(&data_root);
        let functions = Model::from_value(snap);

        assert_eq!(
            functions
                .get("some_pack/functions/trigger_tree_menu/tick.mcfunction")
                .unwrap(),
            Some(Value::from(
                "# function tick\n\
                 execute if entity @s[scores={menu=1}] run function some_pack:open\n\
                 execute if entity @s[scores={menu=5}] run function some_pack:close\n\
                 execute if entity @s[scores={menu=0..}] run scoreboard players set @s menu 0\n\
                 execute if entity @s[scores={menu=0..}] run scoreboard players enable @s menu\n"
            ))
        );
        assert_eq!(
            functions
                .get("some_pack/functions/load.mcfunction")
                .unwrap(),
            Some(Value::from(
                "# function load\n\
                 scoreboard objectives add menu trigger\n\
                 scoreboard players enable @a menu\n"
            ))
        );
        assert_eq!(
            functions
                .get("some_pack/functions/tick.mcfunction")
                .unwrap(),
            Some(Value::from(
                "# function tick\n\
                 execute as @a at @s run function some_pack:trigger_tree_menu/tick\n"
            ))
        );
    }

    #[test]
    fn duplicate_slot_is_rejected() {
        let (_, dir) = data_root();
        let group = dir.trigger_group("menu").unwrap();
        group.create_at("a", 2).unwrap();
        assert!(matches!(
            group.create_at("b", 2),
            Err(PackError::DuplicateSlot { slot: 2, .. })
        ));
    }

    #[test]
    fn slots_claimed_after_lines_reference_them() {
        // A menu function can call group.trigger() for a slot claimed
        // later, as long as the line itself is lazy. Here we just check
        // the command text.
        let (_, dir) = data_root();
        let group = dir.trigger_group("menu").unwrap();
        let (_, slot) = group.create("open").unwrap();
        assert_eq!(
            group.trigger(slot).unwrap().render().unwrap(),
            "trigger menu set 1"
        );
    }
}
