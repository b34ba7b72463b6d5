// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

//! The task model and the interpreter pipeline.
//!
//! Packs become tagged tasks; registered interpreters may regroup them
//! (merge, then split, both in registration order) before each task is
//! dispatched to the interpreter owning its tag for rendering.

use crate::chunk::Pack;
use crate::config::Options;
use crate::document::Block;
use crate::mermaid::DiagramRenderer;

pub const BASE_TAG: &str = "base";
pub const DIAGRAM_TAG: &str = "diagram";

/// One deliverable item. Text goes out as a dialect-tagged message, File as
/// a document attachment, Photo as an image attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendUnit {
    Text {
        content: String,
    },
    File {
        file_name: String,
        file_data: Vec<u8>,
        caption: String,
    },
    Photo {
        file_name: String,
        file_data: Vec<u8>,
        caption: String,
    },
}

/// A tagged pack awaiting dispatch.
#[derive(Debug, Clone)]
pub struct Task {
    pub tag: String,
    pub pack: Pack,
}

impl Task {
    pub fn new(tag: &str, pack: Pack) -> Self {
        Self {
            tag: tag.to_string(),
            pack,
        }
    }

    pub fn base(pack: Pack) -> Self {
        Self::new(BASE_TAG, pack)
    }
}

/// A pluggable pipeline stage. `merge` and `split` default to the identity;
/// `render` turns one task into its send units.
pub trait Interpreter {
    fn tag(&self) -> &str;

    fn merge(&self, tasks: Vec<Task>, options: &Options) -> Vec<Task> {
        let _ = options;
        tasks
    }

    fn split(&self, task: Task, options: &Options) -> Vec<Task> {
        let _ = options;
        vec![task]
    }

    fn render(&self, task: &Task, options: &Options) -> crate::Result<Vec<SendUnit>>;
}

pub struct Pipeline {
    interpreters: Vec<Box<dyn Interpreter>>,
}

impl Pipeline {
    pub fn new(interpreters: Vec<Box<dyn Interpreter>>) -> Self {
        Self { interpreters }
    }

    /// The built-in stack: ordinary content first, diagram extraction second.
    pub fn standard(renderer: Box<dyn DiagramRenderer>) -> Self {
        Self::new(vec![
            Box::new(BaseInterpreter),
            Box::new(DiagramInterpreter::new(renderer)),
        ])
    }

    pub fn run(&self, packs: Vec<Pack>, options: &Options) -> crate::Result<Vec<SendUnit>> {
        let mut tasks: Vec<Task> = packs.into_iter().map(Task::base).collect();
        for interpreter in &self.interpreters {
            tasks = interpreter.merge(tasks, options);
        }
        for interpreter in &self.interpreters {
            tasks = tasks
                .into_iter()
                .flat_map(|task| interpreter.split(task, options))
                .collect();
        }

        let mut units = Vec::new();
        for task in &tasks {
            let owner = self
                .interpreters
                .iter()
                .find(|interpreter| interpreter.tag() == task.tag)
                .unwrap_or_else(|| panic!("no interpreter registered for task tag `{}`", task.tag));
            units.extend(owner.render(task, options)?);
        }
        Ok(units)
    }
}

/// Renders ordinary content. A pack that fits the budget becomes one text
/// unit; an irreducible oversized pack is redirected to a file attachment.
pub struct BaseInterpreter;

impl Interpreter for BaseInterpreter {
    fn tag(&self) -> &str {
        BASE_TAG
    }

    fn render(&self, task: &Task, options: &Options) -> crate::Result<Vec<SendUnit>> {
        let rendered = task.pack.rendered();
        if rendered.is_empty() {
            return Ok(Vec::new());
        }
        if task.pack.rendered_len() <= options.max_message_length {
            return Ok(vec![SendUnit::Text {
                content: rendered.to_string(),
            }]);
        }

        if let [Block::CodeFence { language, content }] = task.pack.blocks() {
            let data = if content.is_empty() {
                task.pack.rendered_raw(options)
            } else {
                content.clone()
            };
            return Ok(vec![SendUnit::File {
                file_name: format!("source.{}", extension_for_language(language)),
                file_data: data.into_bytes(),
                caption: String::new(),
            }]);
        }

        Ok(vec![SendUnit::File {
            file_name: "content.txt".to_string(),
            file_data: task.pack.rendered_raw(options).into_bytes(),
            caption: String::new(),
        }])
    }
}

fn extension_for_language(language: &str) -> &'static str {
    match language.to_ascii_lowercase().as_str() {
        "python" | "py" => "py",
        "rust" | "rs" => "rs",
        "javascript" | "js" => "js",
        "typescript" | "ts" => "ts",
        "c" => "c",
        "cpp" | "c++" => "cpp",
        "go" => "go",
        "java" => "java",
        "kotlin" => "kt",
        "ruby" | "rb" => "rb",
        "php" => "php",
        "swift" => "swift",
        "sh" | "bash" | "shell" => "sh",
        "json" => "json",
        "yaml" | "yml" => "yml",
        "toml" => "toml",
        "xml" => "xml",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        "markdown" | "md" => "md",
        _ => "txt",
    }
}

/// Extracts `mermaid` fences into their own tasks and renders them through
/// the remote diagram service, falling back to a source attachment when the
/// service cannot be reached.
pub struct DiagramInterpreter {
    renderer: Box<dyn DiagramRenderer>,
}

impl DiagramInterpreter {
    pub fn new(renderer: Box<dyn DiagramRenderer>) -> Self {
        Self { renderer }
    }
}

fn diagram_source(block: &Block) -> Option<&str> {
    match block {
        Block::CodeFence { language, content } if language.eq_ignore_ascii_case("mermaid") => {
            Some(content)
        }
        _ => None,
    }
}

impl Interpreter for DiagramInterpreter {
    fn tag(&self) -> &str {
        DIAGRAM_TAG
    }

    fn split(&self, task: Task, options: &Options) -> Vec<Task> {
        if task.tag != BASE_TAG
            || !task
                .pack
                .blocks()
                .iter()
                .any(|block| diagram_source(block).is_some())
        {
            return vec![task];
        }

        let mut tasks = Vec::new();
        let mut run: Vec<Block> = Vec::new();
        for block in task.pack.into_blocks() {
            if diagram_source(&block).is_some() {
                if !run.is_empty() {
                    tasks.push(Task::base(Pack::new(std::mem::take(&mut run), options)));
                }
                tasks.push(Task::new(DIAGRAM_TAG, Pack::new(vec![block], options)));
            } else {
                run.push(block);
            }
        }
        if !run.is_empty() {
            tasks.push(Task::base(Pack::new(run, options)));
        }
        tasks
    }

    fn render(&self, task: &Task, _options: &Options) -> crate::Result<Vec<SendUnit>> {
        let source = match task.pack.blocks() {
            [block] => diagram_source(block)
                .unwrap_or_else(|| panic!("diagram task does not hold a diagram fence")),
            blocks => panic!("diagram task must hold exactly one block, got {}", blocks.len()),
        };

        match self.renderer.render(source) {
            Ok(diagram) => Ok(vec![SendUnit::Photo {
                file_name: "diagram.webp".to_string(),
                file_data: diagram.image,
                caption: diagram.edit_url,
            }]),
            Err(error) => {
                // Recovered locally; the caller never sees the failure.
                tracing::debug!("diagram render failed, attaching the source instead: {error}");
                Ok(vec![SendUnit::File {
                    file_name: "diagram.mmd".to_string(),
                    file_data: source.as_bytes().to_vec(),
                    caption: String::new(),
                }])
            }
        }
    }
}
