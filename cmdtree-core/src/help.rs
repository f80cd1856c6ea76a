//! # Help Generation
//!
//! Human-readable views of the command tree: the full listing behind
//! `--help`, the per-command help behind `<command> --help` and the usage
//! line shown with it.

use crate::expr::Value;
use crate::tree::{ArgumentSpec, CommandGroup, CommandNode, CommandTree};

/// Answer to the description query when a command has none
pub const NO_DESCRIPTION: &str = "This command hasn't any description...";

const TOP_BANNER_WIDTH: usize = 49;
const BOTTOM_BANNER_WIDTH: usize = 70;

/// Every command of the tree, depth-first in declaration order, one per
/// line and indented by depth
pub fn full_help(tree: &CommandTree, prefix: char) -> String {
    let mut listing = String::new();
    list_group(tree.root(), prefix, 0, &mut listing);

    format!(
        "\nList of all commands {}\n\n{}\n{}",
        "~".repeat(TOP_BANNER_WIDTH),
        listing,
        "~".repeat(BOTTOM_BANNER_WIDTH)
    )
}

fn list_group(group: &CommandGroup, prefix: char, depth: usize, out: &mut String) {
    for (name, node) in &group.commands {
        out.push_str(&"\t".repeat(depth));
        out.push_str(name.trim_start_matches(prefix));
        out.push('\n');

        if let CommandNode::Group(child) = node {
            list_group(child, prefix, depth + 1, out);
        }
    }
}

/// Help for a single command reached through `path`
pub fn command_help(node: &CommandNode, path: &[String], aliases: bool, prefix: char) -> String {
    let base = format!("\n\tHelp for {} :", path.join("."));
    let description = node.description().unwrap_or("None");

    match node {
        CommandNode::Runnable(command) => {
            let arguments = if !command.args_declared {
                "None".to_string()
            } else {
                command
                    .args
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            format!(
                "{}\n | Description  : {}\n | Arguments    : {}\n | Returns      : {}\n\n Usage: {}",
                base,
                description,
                arguments,
                Value::from(command.template.as_str()).repr(),
                usage_string(path, &command.args, aliases, prefix)
            )
        }
        CommandNode::Group(group) => {
            let commands = group
                .names()
                .map(|n| Value::from(n).repr())
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{}\n | Description : {}\n | Commands : {}",
                base, description, commands
            )
        }
    }
}

/// Usage line, e.g. `greet (g) -name <name> | <name> | -n <name>`.
///
/// Arguments with a default are bracketed; the command path shows each
/// name's alias letter when alias matching is on.
pub fn usage_string(path: &[String], specs: &[ArgumentSpec], aliases: bool, prefix: char) -> String {
    let mut usage = path
        .iter()
        .map(|name| match name.chars().next() {
            Some(first) if aliases => format!("{} ({})", name, first),
            _ => name.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    for spec in specs {
        let name = &spec.name;
        let mut form = format!("{p}{n} <{n}> | <{n}>", p = prefix, n = name);
        if spec.reduct {
            if let Some(letter) = spec.alias() {
                form.push_str(&format!(" | {}{} <{}>", prefix, letter, name));
            }
        }
        if spec.is_optional() {
            form = format!("[{}]", form);
        }
        usage.push(' ');
        usage.push_str(&form);
    }

    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::RunnableCommand;

    fn path(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> CommandTree {
        let mut math = CommandGroup {
            description: Some("Arithmetic".into()),
            ..CommandGroup::default()
        };
        math.commands.insert(
            "add".into(),
            CommandNode::Runnable(RunnableCommand::new("<a> + <b>")),
        );

        let mut root = CommandGroup::default();
        root.commands.insert("math".into(), CommandNode::Group(math));
        root.commands.insert(
            "--hidden".into(),
            CommandNode::Runnable(RunnableCommand::new("1")),
        );
        CommandTree::new(root)
    }

    #[test]
    fn test_full_help_layout() {
        let help = full_help(&sample(), '-');
        let expected = format!(
            "\nList of all commands {}\n\nmath\n\tadd\nhidden\n\n{}",
            "~".repeat(49),
            "~".repeat(70)
        );
        assert_eq!(help, expected);
    }

    #[test]
    fn test_usage_string() {
        let specs = vec![
            ArgumentSpec::new("name"),
            ArgumentSpec::new("times").with_default("1").with_reduct(false),
        ];
        assert_eq!(
            usage_string(&path(&["say", "hello"]), &specs, true, '-'),
            "say (s) hello (h) -name <name> | <name> | -n <name> [-times <times> | <times>]"
        );
        assert_eq!(usage_string(&path(&["say"]), &[], false, '-'), "say");
    }

    #[test]
    fn test_runnable_help() {
        let command = RunnableCommand::new("'Hi ' + <name>")
            .with_description("Greets")
            .with_arg(ArgumentSpec::new("name"));
        let help = command_help(&CommandNode::Runnable(command), &path(&["greet"]), false, '-');
        assert_eq!(
            help,
            "\n\tHelp for greet :\n | Description  : Greets\n | Arguments    : name\n | Returns      : \"'Hi ' + <name>\"\n\n Usage: greet -name <name> | <name> | -n <name>"
        );
    }

    #[test]
    fn test_declared_but_empty_arguments() {
        let mut command = RunnableCommand::new("1");
        let undeclared = command_help(&CommandNode::Runnable(command.clone()), &path(&["one"]), false, '-');
        assert!(undeclared.contains(" | Arguments    : None\n"));

        command.args_declared = true;
        let empty = command_help(&CommandNode::Runnable(command), &path(&["one"]), false, '-');
        assert!(empty.contains(" | Arguments    : \n"));
    }

    #[test]
    fn test_empty_default_is_not_bracketed() {
        let specs = vec![ArgumentSpec::new("tag").with_default("").with_reduct(false)];
        assert_eq!(
            usage_string(&path(&["mark"]), &specs, false, '-'),
            "mark -tag <tag> | <tag>"
        );
    }

    #[test]
    fn test_group_help() {
        let tree = sample();
        let help = command_help(tree.get("math").unwrap(), &path(&["math"]), true, '-');
        assert_eq!(
            help,
            "\n\tHelp for math :\n | Description : Arithmetic\n | Commands : 'add'"
        );
    }
}
