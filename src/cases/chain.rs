//! The ordered rule table.
//!
//! # Responsibilities
//! - Hold the cases in priority order
//! - Pick the first case whose predicate holds
//!
//! # Design Decisions
//! - Built once at startup, immutable afterwards (shared without locks)
//! - First match wins; later cases are never consulted
//! - The standard chain ends in a catch-all, so selection always succeeds

use crate::cases::case::{
    AlwaysFail, Case, DirectoryIndexFile, DirectoryNoIndexFile, ExistingFile, NoFile, ScriptFile,
};
use crate::config::{ScriptConfig, SiteConfig};
use crate::http::request::RequestContext;
use crate::resource::Resolver;
use crate::responders::ScriptRunner;

/// An ordered list of cases evaluated first-match-wins.
#[derive(Debug)]
pub struct CaseChain {
    cases: Vec<Box<dyn Case>>,
}

impl CaseChain {
    pub fn new(cases: Vec<Box<dyn Case>>) -> Self {
        Self { cases }
    }

    /// The server's chain:
    /// missing → script → file → directory with index → directory → anything.
    ///
    /// Scripts come before plain files so their source is never served.
    pub fn standard(resolver: &Resolver, site: &SiteConfig, scripts: &ScriptConfig) -> Self {
        Self::new(vec![
            Box::new(NoFile),
            Box::new(ScriptFile::new(
                scripts.extension.clone(),
                ScriptRunner::from_config(scripts),
            )),
            Box::new(ExistingFile),
            Box::new(DirectoryIndexFile::new(
                site.index_file.clone(),
                resolver.clone(),
            )),
            Box::new(DirectoryNoIndexFile::new(site.index_file.clone())),
            Box::new(AlwaysFail),
        ])
    }

    /// First case whose predicate accepts `ctx`.
    pub fn select(&self, ctx: &RequestContext) -> Option<&dyn Case> {
        self.cases
            .iter()
            .find(|case| case.test(ctx))
            .map(|case| &**case)
    }

    /// Case names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.cases.iter().map(|case| case.name()).collect()
    }
}
