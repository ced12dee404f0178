////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! End-to-end generation: resolve a request, render every artifact in memory, then write.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result, Warning},
    generators::{mojo_gen::MojoGenerator, Artifact, FormatOptions, Generator},
    registry::{Profile, Registry},
};

/// Everything a generation run depends on besides the registry itself.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Request {
    pub version: String,
    pub profile: Profile,
    pub extensions: BTreeSet<String>,
    pub format: FormatOptions,
}

impl Default for Request {
    fn default() -> Request {
        Request {
            version: "4.6".to_owned(),
            profile: Profile::Core,
            extensions: BTreeSet::new(),
            format: FormatOptions::default(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

/// The rendered output of one run.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bindings {
    pub files: Vec<GeneratedFile>,
    pub warnings: Vec<Warning>,
    pub command_count: usize,
    pub enum_count: usize,
}

/// Resolves `request` against `registry` and renders every artifact.
///
/// Nothing touches the filesystem; call [`Bindings::write_to`] afterwards.
pub fn generate(registry: &Registry, request: &Request) -> Result<Bindings> {
    let api = registry.resolve(&request.version, request.profile, &request.extensions)?;
    let generator = MojoGenerator::new(request.format);

    let mut files = Vec::with_capacity(Artifact::ALL.len());
    for artifact in Artifact::ALL {
        let name = generator.file_name(artifact, &api);
        let mut contents = Vec::new();
        generator
            .write(artifact, &api, &mut contents)
            .map_err(|e| Error::io(&name, e))?;
        // every writer above emits UTF-8 text
        let contents = String::from_utf8_lossy(&contents).into_owned();
        files.push(GeneratedFile { name, contents });
    }

    let warnings = api.warnings();

    info!(
        "generated {} {} {} bindings: {} functions, {} constants, {} warnings",
        registry.api,
        api.version,
        api.profile,
        api.commands.len(),
        api.enums.len(),
        warnings.len()
    );

    Ok(Bindings {
        files,
        warnings,
        command_count: api.commands.len(),
        enum_count: api.enums.len(),
    })
}

impl Bindings {
    pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Writes every file into `dir`, creating it if needed.
    ///
    /// Each file is written to a temporary sibling first and renamed into place once all of them
    ///  have been written.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let tmp = dir.join(format!(".{}.tmp", file.name));
            if let Err(e) = fs::write(&tmp, &file.contents) {
                discard(&staged);
                let _ = fs::remove_file(&tmp);
                return Err(Error::io(tmp, e));
            }
            staged.push((tmp, dir.join(&file.name)));
        }

        for (i, (tmp, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp, path) {
                discard(&staged[i..]);
                return Err(Error::io(path, e));
            }
            debug!("wrote {}", path.display());
        }

        Ok(())
    }
}

/// Removes staged temporaries that were not renamed into place.
fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(e) = fs::remove_file(tmp) {
            debug!("could not remove {}: {}", tmp.display(), e);
        }
    }
}
