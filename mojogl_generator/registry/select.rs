////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Resolution of a (version, profile, extensions) request against a [`Registry`].

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::{Action, Command, EnumConstant, Profile, Registry, Rule, TargetKind, TypeDef, Version};
use crate::{
    error::{Error, Result, Warning},
    types,
};

/// The commands, constants and types selected for one generation request.
///
/// All lists are in registry declaration order.
#[derive(Clone, Debug)]
pub struct ResolvedApi<'a> {
    pub registry: &'a Registry,
    pub version: Version,
    pub profile: Profile,
    /// Sorted.
    pub extensions: Vec<String>,
    pub commands: Vec<&'a Command>,
    pub enums: Vec<&'a EnumConstant>,
    /// Only the types referenced by `commands`.
    pub types: Vec<&'a TypeDef>,
}

/// Commands and constants currently included.
///
/// `<type>` rules are not tracked: the emitted types are exactly those the selected commands
///  reference.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
struct Included {
    commands: BTreeSet<String>,
    enums: BTreeSet<String>,
}

impl Included {
    fn apply(mut self, rule: &Rule) -> Included {
        let set = match rule.kind {
            TargetKind::Command => &mut self.commands,
            TargetKind::Enum => &mut self.enums,
            TargetKind::Type => return self,
        };
        match rule.action {
            Action::Require => set.insert(rule.name.clone()),
            Action::Remove => set.remove(&rule.name),
        };
        self
    }
}

impl Registry {
    /// Computes the API visible at `version` for `profile`, plus the named extensions.
    ///
    /// Features up to and including `version` are applied in ascending order, each one's rules
    ///  in document order, so a later `<remove>` always beats an earlier `<require>`. Blocks
    ///  restricted to another profile are skipped. Extensions are applied last; within them
    ///  removals go first so that anything an extension requires ends up included.
    pub fn resolve<'a>(&'a self, version: &str, profile: Profile, extensions: &BTreeSet<String>) -> Result<ResolvedApi<'a>> {
        let target = self.check_version(version)?;
        let selected = self.check_extensions(extensions)?;

        let feature_rules = self
            .features
            .iter()
            .take_while(|f| f.version <= target)
            .flat_map(|f| f.rules.iter());
        let extension_rules = selected.iter().flat_map(|e| e.rules.iter());
        let extension_removes = extension_rules.clone().filter(|r| r.action == Action::Remove);
        let extension_requires = extension_rules.filter(|r| r.action == Action::Require);

        let included = feature_rules
            .chain(extension_removes)
            .chain(extension_requires)
            .filter(|r| r.applies_to(profile))
            .fold(Included::default(), Included::apply);

        let commands: Vec<&Command> = self.commands.iter().filter(|c| included.commands.contains(&c.name)).collect();
        let enums: Vec<&EnumConstant> = self.enums.iter().filter(|e| included.enums.contains(&e.name)).collect();

        let referenced: HashSet<&str> = commands
            .iter()
            .flat_map(|c| std::iter::once(&c.return_type).chain(c.params.iter().map(|p| &p.ty)))
            .map(|ty| ty.name.as_str())
            .collect();
        let types: Vec<&TypeDef> = self.types.iter().filter(|t| referenced.contains(t.name.as_str())).collect();

        debug!(
            "resolved {} {} {}: {} commands, {} enums, {} types",
            self.api,
            target,
            profile,
            commands.len(),
            enums.len(),
            types.len()
        );

        Ok(ResolvedApi {
            registry: self,
            version: target,
            profile,
            extensions: extensions.iter().cloned().collect(),
            commands,
            enums,
            types,
        })
    }

    fn check_version(&self, version: &str) -> Result<Version> {
        let unknown = || Error::UnknownVersion {
            api: self.api.to_string(),
            requested: version.to_owned(),
            valid: self.versions().iter().map(Version::to_string).collect(),
        };

        let target: Version = version.parse().map_err(|_| unknown())?;
        match self.latest_version() {
            Some(latest) if target <= latest => Ok(target),
            _ => Err(unknown()),
        }
    }

    fn check_extensions(&self, names: &BTreeSet<String>) -> Result<Vec<&super::Extension>> {
        names
            .iter()
            .map(|name| {
                self.extension(name).ok_or_else(|| Error::UnknownExtension {
                    requested: name.clone(),
                    valid: self.extension_names().into_iter().map(str::to_owned).collect(),
                })
            })
            .collect()
    }
}

impl<'a> ResolvedApi<'a> {
    /// One warning per type the mapper does not recognize, sorted by type name.
    pub fn warnings(&self) -> Vec<Warning> {
        let mut unmapped: BTreeMap<&str, Vec<String>> = BTreeMap::new();

        for cmd in &self.commands {
            let refs = std::iter::once(&cmd.return_type).chain(cmd.params.iter().map(|p| &p.ty));
            for ty in refs {
                if types::is_mapped(&ty.name) {
                    continue;
                }
                let users = unmapped.entry(ty.name.as_str()).or_default();
                if !users.contains(&cmd.name) {
                    users.push(cmd.name.clone());
                }
            }
        }

        unmapped
            .into_iter()
            .map(|(name, used_by)| {
                warn!("unmapped type {} (used by {})", name, used_by.join(", "));
                Warning::UnmappedType {
                    type_name: name.to_owned(),
                    used_by,
                }
            })
            .collect()
    }

    pub fn command_names(&self) -> Vec<&'a str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn enum_names(&self) -> Vec<&'a str> {
        self.enums.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn includes_command(&self, name: &str) -> bool {
        self.commands.iter().any(|c| c.name == name)
    }
}
