//! The engine itself: the template and filter registries and the render
//! entry point

use std::collections::HashMap;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::context::Context;
use crate::errors::{Error, Result};
use crate::filters::{string, FilterFn};
use crate::renderer::{Processor, TemplateStack};
use crate::template::Template;

/// Holds the parsed templates and the registered filters.
///
/// Templates are parsed once at registration and shared read-only between
/// renders, so one engine can serve concurrent render calls; registration
/// serializes against them through the registry lock.
#[derive(Debug)]
pub struct Engine {
    templates: RwLock<HashMap<String, Arc<Template>>>,
    filters: HashMap<String, FilterFn>,
}

impl Engine {
    /// Create a new instance of the engine parsing all the templates found
    /// in the glob.
    ///
    /// Errors are forwarded from the first template that fails to parse.
    ///
    /// ```rust,no_run
    /// # use weft::Engine;
    /// let engine = Engine::new("templates/**/*").unwrap();
    /// ```
    pub fn new(dir: &str) -> Result<Engine> {
        let engine = Engine::default();
        engine.load_from_glob(dir)?;
        Ok(engine)
    }

    fn load_from_glob(&self, dir: &str) -> Result<()> {
        let star = match dir.find('*') {
            Some(position) => position,
            None => {
                return Err(Error::msg(format!(
                    "Engine expects a glob as input, no `*` was found in `{}`",
                    dir
                )));
            }
        };
        // the dir given to the engine is stripped from template names so
        // users don't have to prefix every lookup
        let parent_dir = dir.split_at(star).0;

        let walker = globwalk::glob(dir)
            .map_err(|e| Error::chain(format!("Invalid glob `{}`", dir), e))?;
        for entry in walker.filter_map(std::result::Result::ok) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = path
                .to_string_lossy()
                .replace('\\', "/")
                .replacen(parent_dir, "", 1);
            self.add_template_file(path, Some(&name))?;
        }
        Ok(())
    }

    /// Add a single template to the engine, parsing it eagerly: errors are
    /// reported here, not at render time.
    ///
    /// This will overwrite a template already registered under `name`.
    ///
    /// ```rust
    /// # use weft::Engine;
    /// let engine = Engine::default();
    /// engine.add_raw_template("new.html", "Hello {{ name }}").unwrap();
    /// ```
    pub fn add_raw_template(&self, name: &str, source: &str) -> Result<()> {
        let template = Template::new(name, source)
            .map_err(|e| Error::chain(format!("Failed to parse `{}`", name), e))?;
        debug!(template = %name, "registered template");

        let mut templates = self.templates.write().expect("template registry lock poisoned");
        templates.insert(name.to_string(), Arc::new(template));
        Ok(())
    }

    /// Add all the templates given to the engine
    ///
    /// ```rust
    /// # use weft::Engine;
    /// let engine = Engine::default();
    /// engine.add_raw_templates(vec![
    ///     ("new.html", "blabla"),
    ///     ("new2.html", "hello {{ name }}"),
    /// ]).unwrap();
    /// ```
    pub fn add_raw_templates(&self, templates: Vec<(&str, &str)>) -> Result<()> {
        for (name, source) in templates {
            self.add_raw_template(name, source)?;
        }
        Ok(())
    }

    /// Add a template from a file: if no name is given, the path is used as
    /// the template name.
    pub fn add_template_file<P: AsRef<Path>>(&self, path: P, name: Option<&str>) -> Result<()> {
        let path = path.as_ref();

        let mut file = File::open(path)
            .map_err(|e| Error::chain(format!("Couldn't open template '{:?}'", path), e))?;
        let mut source = String::new();
        file.read_to_string(&mut source)
            .map_err(|e| Error::chain(format!("Failed to read template '{:?}'", path), e))?;

        match name {
            Some(name) => self.add_raw_template(name, &source),
            None => {
                let name = path.to_string_lossy().replace('\\', "/");
                self.add_raw_template(&name, &source)
            }
        }
    }

    /// Renders the template with the given context.
    ///
    /// The inheritance chain is resolved first: a missing ancestor or a
    /// cycle in the `extends` declarations fails before anything renders.
    /// On failure any partial output is discarded.
    ///
    /// ```rust
    /// # use weft::{Engine, Context};
    /// let engine = Engine::default();
    /// engine.add_raw_template("hello", "Hello {{ name }}").unwrap();
    /// let mut context = Context::new();
    /// context.insert("name", "World");
    /// assert_eq!(engine.render("hello", &mut context).unwrap(), "Hello World");
    /// ```
    pub fn render(&self, template_name: &str, context: &mut Context) -> Result<String> {
        let chain = self.inheritance_chain(template_name)?;
        let stack = TemplateStack::new(self, &chain);
        Processor::new(stack).render(context)
    }

    /// Resolves the ancestor chain of `name`, oldest ancestor first.
    ///
    /// The registry read lock is held only while the chain `Arc`s are
    /// cloned; the actual tree walk happens without it.
    pub(crate) fn inheritance_chain(&self, name: &str) -> Result<Vec<Arc<Template>>> {
        let templates = self.templates.read().expect("template registry lock poisoned");

        let mut chain: Vec<Arc<Template>> = vec![];
        let mut visited: Vec<String> = vec![];
        let mut current = name.to_string();

        loop {
            if visited.contains(&current) {
                visited.push(current);
                return Err(Error::circular_extend(name, visited));
            }
            let template = match templates.get(&current) {
                Some(template) => Arc::clone(template),
                None if current == name => return Err(Error::template_not_found(&current)),
                None => {
                    let child = visited.last().expect("a parent lookup follows a child");
                    return Err(Error::missing_parent(child, &current));
                }
            };
            visited.push(current);
            let parent = template.extends.clone();
            chain.push(template);
            match parent {
                Some(parent) => current = parent,
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }

    /// Looks up a registered filter
    pub(crate) fn get_filter(&self, name: &str) -> Result<&FilterFn> {
        match self.filters.get(name) {
            Some(filter) => Ok(filter),
            None => Err(Error::filter_not_found(name)),
        }
    }

    /// Register a filter with the engine, replacing any existing filter
    /// with the same name.
    ///
    /// ```rust
    /// # use weft::Engine;
    /// let mut engine = Engine::default();
    /// engine.register_filter("shout", |value| Ok(format!("{}!", value)));
    /// ```
    pub fn register_filter(&mut self, name: &str, filter: FilterFn) {
        self.filters.insert(name.to_string(), filter);
    }

    fn register_builtin_filters(&mut self) {
        self.register_filter("upper", string::upper);
        self.register_filter("lower", string::lower);
        self.register_filter("trim", string::trim);
        self.register_filter("capitalize", string::capitalize);
        self.register_filter("title", string::title);
        self.register_filter("striptags", string::striptags);
        self.register_filter("spaceless", string::spaceless);
        self.register_filter("nl2br", string::nl2br);
        self.register_filter("escape", string::escape);
        self.register_filter("reverse", string::reverse);
        self.register_filter("wordcount", string::wordcount);

        #[cfg(feature = "urlencode")]
        self.register_filter("urlencode", string::urlencode);
        #[cfg(feature = "slug")]
        self.register_filter("slugify", string::slugify);
    }
}

impl Default for Engine {
    fn default() -> Engine {
        let mut engine =
            Engine { templates: RwLock::new(HashMap::new()), filters: HashMap::new() };
        engine.register_builtin_filters();
        engine
    }
}
