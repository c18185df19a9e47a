// Walks every resource of a provider and writes each one through the handler chain

use log::{debug, info, warn};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::pipeline::dump::{DumpRequest, dump};
use crate::pipeline::fs_ops::{ensure_dir, sanitize_filename};
use crate::resource::{ResourceId, ResourceProvider, TypeId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub written: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
struct Job {
    kind: TypeId,
    name: ResourceId,
    locale: u16,
    dir: PathBuf,
}

pub struct DumpWorker<'a, P: ResourceProvider + Sync> {
    provider: &'a P,
    thread_count: usize,
}

impl<'a, P: ResourceProvider + Sync> DumpWorker<'a, P> {
    /// `thread_count` 0 lets rayon pick, 1 processes everything inline.
    pub fn new(provider: &'a P, thread_count: usize) -> Self {
        Self {
            provider,
            thread_count,
        }
    }

    /// Dumps every resource below `output_dir`, which must already exist.
    ///
    /// Failures are logged per resource and never abort the run.
    pub fn run(&self, output_dir: &Path) -> DumpSummary {
        let jobs = self.plan(output_dir);
        info!("Found {} resources to process", jobs.len());

        let results: Vec<bool> = if self.thread_count == 1 {
            jobs.iter().map(|job| self.process(job)).collect()
        } else {
            match ThreadPoolBuilder::new().num_threads(self.thread_count).build() {
                Ok(pool) => pool.install(|| jobs.par_iter().map(|job| self.process(job)).collect()),
                Err(e) => {
                    warn!("Could not start worker threads ({}), running inline", e);
                    jobs.iter().map(|job| self.process(job)).collect()
                }
            }
        };

        let written = results.iter().filter(|ok| **ok).count();
        DumpSummary {
            written,
            failed: results.len() - written,
        }
    }

    /// Creates the output directories and lists every (type, name, locale).
    fn plan(&self, output_dir: &Path) -> Vec<Job> {
        let mut jobs = Vec::new();

        for kind in self.provider.types() {
            let type_dir = output_dir.join(sanitize_filename(&kind.type_name()));
            if let Err(e) = ensure_dir(&type_dir) {
                warn!("Cannot create directory '{}': {}", type_dir.display(), e);
                continue;
            }

            for name in self.provider.names(&kind) {
                let locales = self.provider.locales(&kind, &name);
                let split = locales.len() > 1;

                for locale in locales {
                    let dir = if split {
                        let dir = type_dir.join(locale.to_string());
                        if let Err(e) = ensure_dir(&dir) {
                            warn!("Cannot create directory '{}': {}", dir.display(), e);
                            continue;
                        }
                        dir
                    } else {
                        type_dir.clone()
                    };

                    jobs.push(Job {
                        kind: kind.clone(),
                        name: name.clone(),
                        locale,
                        dir,
                    });
                }
            }
        }

        jobs
    }

    fn process(&self, job: &Job) -> bool {
        let Some(data) = self.provider.fetch(&job.kind, &job.name, job.locale) else {
            warn!(
                "Cannot read {}/{} (locale {})",
                job.kind.type_name(),
                job.name,
                job.locale
            );
            return false;
        };

        let req = DumpRequest {
            provider: self.provider,
            kind: &job.kind,
            name: &job.name,
            locale: job.locale,
            data,
        };
        match dump(&req, &job.dir) {
            Some(path) => {
                debug!("Wrote {}", path.display());
                true
            }
            None => {
                warn!(
                    "Cannot save {}",
                    job.dir.join(sanitize_filename(&job.name.to_string())).display()
                );
                false
            }
        }
    }
}
