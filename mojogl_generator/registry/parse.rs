////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Extraction of the typed [`Registry`] from a loaded [`Document`].

use std::collections::{HashMap, HashSet};

use super::{
    xml::{Document, Element, Node},
    Action, Api, Command, EnumConstant, EnumValue, Extension, Feature, Param, Profile, Registry, Rule,
    TargetKind, TypeDef, TypeRef, Version,
};
use crate::{
    error::{Error, Location, Result},
    types::{self, HostType},
};

/// C words that are qualifiers rather than part of a type's name.
const QUALIFIERS: &[&str] = &["const", "struct", "volatile"];

pub(super) fn extract(doc: &Document, api: Api) -> Result<Registry> {
    let ex = Extractor {
        source_name: &doc.source_name,
        api,
    };
    let root = &doc.root;

    let mut types = ex.types(root);
    let enums = ex.enums(root)?;
    let mut features = ex.features(root)?;
    let extensions = ex.extensions(root)?;
    features.sort_by_key(|f| f.version);

    ex.check_references(root, &features, &extensions)?;

    let commands = ex.commands(root, &features, &extensions)?;
    ex.add_undeclared_types(&mut types, &commands);

    debug!(
        "extracted {} types, {} enums, {} commands, {} features, {} extensions for {}",
        types.len(),
        enums.len(),
        commands.len(),
        features.len(),
        extensions.len(),
        api
    );

    Ok(Registry::new(doc.source_name.clone(), api, types, enums, commands, features, extensions))
}

struct Extractor<'a> {
    source_name: &'a str,
    api: Api,
}

impl<'a> Extractor<'a> {
    fn integrity(&self, location: Location, name: &str, message: impl Into<String>) -> Error {
        Error::SchemaIntegrity {
            source_name: self.source_name.to_owned(),
            location,
            name: name.to_owned(),
            message: message.into(),
        }
    }

    /// True unless the element is tagged for a different api.
    fn is_for_api(&self, elem: &Element) -> bool {
        elem.attr("api").map_or(true, |api| api == self.api.as_str())
    }

    fn types(&self, root: &Element) -> Vec<TypeDef> {
        let mut types: Vec<TypeDef> = Vec::new();
        // name -> (index, was tagged with our api)
        let mut seen: HashMap<String, (usize, bool)> = HashMap::new();

        for elem in root.elements_named("types").flat_map(|t| t.elements_named("type")) {
            if !self.is_for_api(elem) {
                continue;
            }

            let name = match type_name(elem) {
                Some(name) => name,
                None => continue,
            };
            let tagged = elem.attr("api").is_some();
            let def = TypeDef {
                host: types::base_type(&name).unwrap_or(HostType::Opaque),
                declaration: collapse_whitespace(&elem.text()),
                location: elem.location,
                name,
            };

            let existing = seen.get(&def.name).copied();
            match existing {
                Some((i, false)) if tagged => {
                    seen.insert(def.name.clone(), (i, true));
                    types[i] = def;
                },
                Some(_) => debug!("ignoring duplicate type {} at {}", def.name, def.location),
                None => {
                    seen.insert(def.name.clone(), (types.len(), tagged));
                    types.push(def);
                },
            }
        }

        types
    }

    fn enums(&self, root: &Element) -> Result<Vec<EnumConstant>> {
        let mut enums: Vec<EnumConstant> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for block in root.elements_named("enums") {
            let block_group = block.attr("group");

            for elem in block.elements_named("enum") {
                if !self.is_for_api(elem) {
                    continue;
                }

                let (name, raw_value) = match (elem.attr("name"), elem.attr("value")) {
                    (Some(name), Some(value)) => (name, value),
                    _ => {
                        warn!("{}:{}: <enum> without name or value skipped", self.source_name, elem.location);
                        continue;
                    },
                };

                let value = match raw_value.parse::<EnumValue>() {
                    Ok(value) => value,
                    Err(e) => {
                        warn!("{}:{}: enum {} skipped: {}", self.source_name, elem.location, name, e);
                        continue;
                    },
                };

                if let Some(&i) = seen.get(name) {
                    if enums[i].value != value {
                        return Err(self.integrity(
                            elem.location,
                            name,
                            format!("redefined with a different value (first defined at {})", enums[i].location),
                        ));
                    }
                    continue;
                }

                let mut groups: Vec<String> = block_group.map(str::to_owned).into_iter().collect();
                for group in elem.attr("group").into_iter().flat_map(|g| g.split(',')) {
                    let group = group.trim();
                    if !group.is_empty() && !groups.iter().any(|g| g == group) {
                        groups.push(group.to_owned());
                    }
                }

                seen.insert(name.to_owned(), enums.len());
                enums.push(EnumConstant {
                    name: name.to_owned(),
                    value,
                    groups,
                    alias: elem.attr("alias").map(str::to_owned),
                    location: elem.location,
                });
            }
        }

        Ok(enums)
    }

    fn features(&self, root: &Element) -> Result<Vec<Feature>> {
        let mut features = Vec::new();

        for elem in root.elements_named("feature") {
            if elem.attr("api") != Some(self.api.as_str()) {
                continue;
            }

            let number = elem
                .attr("number")
                .ok_or_else(|| self.integrity(elem.location, elem.attr("name").unwrap_or("<feature>"), "missing `number`"))?;
            let version = number
                .parse::<Version>()
                .map_err(|e| self.integrity(elem.location, elem.attr("name").unwrap_or(number), e))?;

            features.push(Feature {
                name: elem.attr("name").unwrap_or(number).to_owned(),
                version,
                rules: self.rules(elem)?,
                location: elem.location,
            });
        }

        Ok(features)
    }

    fn extensions(&self, root: &Element) -> Result<Vec<Extension>> {
        let mut extensions = Vec::new();

        for elem in root.elements_named("extensions").flat_map(|e| e.elements_named("extension")) {
            let name = match elem.attr("name") {
                Some(name) => name,
                None => {
                    warn!("{}:{}: <extension> without name skipped", self.source_name, elem.location);
                    continue;
                },
            };
            if !elem.attr("supported").map_or(true, |s| self.api.is_supported_by(s)) {
                continue;
            }

            extensions.push(Extension {
                name: name.to_owned(),
                rules: self.rules(elem)?,
                location: elem.location,
            });
        }

        Ok(extensions)
    }

    /// The `<require>`/`<remove>` blocks of a feature or extension, flattened in document order.
    fn rules(&self, parent: &Element) -> Result<Vec<Rule>> {
        let mut rules = Vec::new();

        for block in parent.elements() {
            let action = match &*block.name {
                "require" => Action::Require,
                "remove" => Action::Remove,
                _ => continue,
            };
            if !self.is_for_api(block) {
                continue;
            }
            // gles1 tags its blocks `common`, which is not a requestable profile
            let profile = block.attr("profile").and_then(|p| match p.parse::<Profile>() {
                Ok(p) => Some(p),
                Err(_) => {
                    debug!("{}:{}: profile `{}` applies to every profile", self.source_name, block.location, p);
                    None
                },
            });

            for item in block.elements() {
                let kind = match &*item.name {
                    "command" => TargetKind::Command,
                    "enum" => TargetKind::Enum,
                    "type" => TargetKind::Type,
                    _ => continue,
                };
                let name = item
                    .attr("name")
                    .ok_or_else(|| {
                        self.integrity(item.location, parent.attr("name").unwrap_or(&parent.name), format!("<{}> without `name`", item.name))
                    })?;

                rules.push(Rule {
                    action,
                    kind,
                    name: name.to_owned(),
                    profile,
                    location: item.location,
                });
            }
        }

        Ok(rules)
    }

    /// Every rule must name something defined somewhere in the document, for any api.
    fn check_references(&self, root: &Element, features: &[Feature], extensions: &[Extension]) -> Result<()> {
        let mut defined: HashSet<(TargetKind, String)> = HashSet::new();

        for elem in root.elements_named("types").flat_map(|t| t.elements_named("type")) {
            if let Some(name) = type_name(elem) {
                defined.insert((TargetKind::Type, name));
            }
        }
        let mut unusable: HashSet<&str> = HashSet::new();
        for elem in root.elements_named("enums").flat_map(|e| e.elements_named("enum")) {
            let name = match elem.attr("name") {
                Some(name) => name,
                None => continue,
            };
            if elem.attr("value").map_or(false, |v| v.parse::<EnumValue>().is_ok()) {
                defined.insert((TargetKind::Enum, name.to_owned()));
            } else {
                unusable.insert(name);
            }
        }
        for elem in root.elements_named("commands").flat_map(|c| c.elements_named("command")) {
            if let Some(name) = elem.child("proto").and_then(|p| p.child("name")) {
                defined.insert((TargetKind::Command, name.text().trim().to_owned()));
            }
        }

        let rules = features
            .iter()
            .flat_map(|f| f.rules.iter())
            .chain(extensions.iter().flat_map(|e| e.rules.iter()));
        for rule in rules {
            if defined.contains(&(rule.kind, rule.name.clone())) {
                continue;
            }
            let message = if rule.kind == TargetKind::Enum && unusable.contains(rule.name.as_str()) {
                "referenced enum has no usable value".to_owned()
            } else {
                format!("referenced {} is never defined", rule.kind)
            };
            return Err(self.integrity(rule.location, &rule.name, message));
        }

        Ok(())
    }

    fn commands(&self, root: &Element, features: &[Feature], extensions: &[Extension]) -> Result<Vec<Command>> {
        #[derive(Default)]
        struct Membership {
            introduced_in: Vec<Version>,
            removed_in: Vec<Version>,
            extensions: Vec<String>,
        }

        let mut membership: HashMap<&str, Membership> = HashMap::new();
        for feature in features {
            for rule in feature.rules.iter().filter(|r| r.kind == TargetKind::Command) {
                let entry = membership.entry(&rule.name).or_default();
                let versions = match rule.action {
                    Action::Require => &mut entry.introduced_in,
                    Action::Remove => &mut entry.removed_in,
                };
                if !versions.contains(&feature.version) {
                    versions.push(feature.version);
                }
            }
        }
        for ext in extensions {
            for rule in ext.rules.iter().filter(|r| r.kind == TargetKind::Command && r.action == Action::Require) {
                let entry = membership.entry(&rule.name).or_default();
                if !entry.extensions.contains(&ext.name) {
                    entry.extensions.push(ext.name.clone());
                }
            }
        }

        let mut commands = Vec::new();
        let mut seen = HashSet::new();

        for elem in root.elements_named("commands").flat_map(|c| c.elements_named("command")) {
            let proto = match elem.child("proto") {
                Some(proto) => proto,
                None => {
                    warn!("{}:{}: <command> without <proto> skipped", self.source_name, elem.location);
                    continue;
                },
            };
            let name = match proto.child("name") {
                Some(name) => name.text().trim().to_owned(),
                None => {
                    warn!("{}:{}: <proto> without <name> skipped", self.source_name, proto.location);
                    continue;
                },
            };
            if !seen.insert(name.clone()) {
                debug!("ignoring duplicate command {} at {}", name, elem.location);
                continue;
            }

            let mut params = Vec::new();
            for (i, param) in elem.elements_named("param").enumerate() {
                if !self.is_for_api(param) {
                    continue;
                }
                let param_name = param
                    .child("name")
                    .map(|n| n.text().trim().to_owned())
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| self.integrity(param.location, &name, format!("parameter {} has no <name>", i)))?;
                params.push(Param {
                    name: param_name,
                    ty: type_ref(param),
                    group: param.attr("group").map(str::to_owned),
                    len: param.attr("len").map(str::to_owned),
                });
            }

            let Membership {
                introduced_in,
                removed_in,
                extensions,
            } = membership.remove(name.as_str()).unwrap_or_default();

            commands.push(Command {
                return_type: type_ref(proto),
                params,
                alias: elem.child("alias").and_then(|a| a.attr("name")).map(str::to_owned),
                introduced_in,
                removed_in,
                extensions,
                location: elem.location,
                name,
            });
        }

        Ok(commands)
    }

    /// Records a `TypeDef` for every `<ptype>` that has no `<type>` entry so that lookups never
    ///  miss. Unrecognized ones map to `OpaquePointer`.
    fn add_undeclared_types(&self, types: &mut Vec<TypeDef>, commands: &[Command]) {
        let mut known: HashSet<String> = types.iter().map(|t| t.name.clone()).collect();

        for cmd in commands {
            let refs = std::iter::once(&cmd.return_type).chain(cmd.params.iter().map(|p| &p.ty));
            for ty in refs {
                if is_raw_c_type(&ty.name) || known.contains(&ty.name) {
                    continue;
                }
                debug!("type {} used by {} is never declared", ty.name, cmd.name);
                known.insert(ty.name.clone());
                types.push(TypeDef {
                    name: ty.name.clone(),
                    declaration: String::new(),
                    host: types::base_type(&ty.name).unwrap_or(HostType::Opaque),
                    location: cmd.location,
                });
            }
        }
    }
}

/// Name of a `<type>` entry: the `<name>` child, falling back to the `name` attribute.
///
/// gl.xml spells some of them `<name>struct _cl_context</name>`; the qualifier is dropped.
fn type_name(elem: &Element) -> Option<String> {
    elem.child("name")
        .map(|n| strip_qualifiers(&n.text()))
        .or_else(|| elem.attr("name").map(str::to_owned))
        .filter(|n| !n.is_empty())
}

/// Reads the type of a `<proto>` or `<param>`.
///
/// `const <ptype>GLchar</ptype> *const*<name>x</name>` is `GLchar` at depth 2, const. A trailing
///  `[N]` after the name counts as one more level.
fn type_ref(elem: &Element) -> TypeRef {
    let mut decl = String::new();
    let mut suffix = String::new();
    let mut ptype = None;
    let mut after_name = false;

    for node in &elem.children {
        match node {
            Node::Text(text) if after_name => suffix.push_str(text),
            Node::Text(text) => decl.push_str(text),
            Node::Element(e) if e.name == "name" => after_name = true,
            Node::Element(e) if e.name == "ptype" && !after_name => {
                let text = e.text();
                decl.push(' ');
                decl.push_str(&text);
                decl.push(' ');
                ptype = Some(strip_qualifiers(&text));
            },
            Node::Element(_) => {},
        }
    }

    let words: Vec<&str> = decl.split(|c: char| c.is_whitespace() || c == '*').filter(|w| !w.is_empty()).collect();
    let is_const = words.iter().any(|&w| w == "const");
    let name = ptype.unwrap_or_else(|| {
        let base: Vec<&str> = words.iter().copied().filter(|w| !QUALIFIERS.contains(w)).collect();
        if base.is_empty() {
            "void".to_owned()
        } else {
            base.join(" ")
        }
    });

    TypeRef {
        name,
        pointer_depth: decl.matches('*').count() + suffix.matches('[').count(),
        is_const,
    }
}

fn is_raw_c_type(name: &str) -> bool {
    name.chars().next().map_or(true, |c| c.is_ascii_lowercase()) && types::is_mapped(name)
}

/// `struct _cl_event` -> `_cl_event`
fn strip_qualifiers(text: &str) -> String {
    text.split_whitespace().filter(|w| !QUALIFIERS.contains(w)).collect::<Vec<_>>().join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn registry(body: &str) -> Result<Registry> {
        Registry::from_str("test.xml", &format!("<registry>{}</registry>", body), Api::Gl)
    }

    fn param_of(xml: &str) -> TypeRef {
        let doc = Document::from_str("test", xml).unwrap();
        type_ref(&doc.root)
    }

    #[test]
    fn parses_types() {
        let reg = registry(
            "<types>
                <type>typedef float <name>GLfloat</name>;</type>
                <type>typedef int <name>GLint</name>;</type>
                <type name=\"khrplatform\">#include &lt;KHR/khrplatform.h&gt;</type>
            </types>",
        )
        .unwrap();

        assert_eq!(reg.types.len(), 3);
        let float = reg.type_def("GLfloat").unwrap();
        assert_eq!(float.declaration, "typedef float GLfloat;");
        assert_eq!(float.host.to_string(), "Float32");
        assert_eq!(reg.type_def("GLint").unwrap().host.to_string(), "Int32");
        assert_eq!(reg.type_def("khrplatform").unwrap().host, HostType::Opaque);
    }

    #[test]
    fn api_tagged_types_win() {
        let reg = registry(
            "<types>
                <type>typedef int <name>GLfixed</name>;</type>
                <type api=\"gl\">typedef long <name>GLfixed</name>;</type>
                <type api=\"gles2\">typedef short <name>GLfixed</name>;</type>
            </types>",
        )
        .unwrap();
        assert_eq!(reg.types.len(), 1);
        assert_eq!(reg.types[0].declaration, "typedef long GLfixed;");
    }

    #[test]
    fn parses_enums_with_groups() {
        let reg = registry(
            r#"<enums group="ClearBufferMask">
                <enum value="0x00004000" name="GL_COLOR_BUFFER_BIT" group="AttribMask,ClearBufferMask"/>
                <enum value="0x00000100" name="GL_DEPTH_BUFFER_BIT"/>
                <enum value="-1" name="GL_NEGATIVE"/>
                <enum value="0x8259" name="GL_ACTIVE_PROGRAM_EXT" api="gles2"/>
                <enum value="0x8B8D" name="GL_ACTIVE_PROGRAM_EXT" api="gl"/>
            </enums>"#,
        )
        .unwrap();

        let color = reg.enum_constant("GL_COLOR_BUFFER_BIT").unwrap();
        assert_eq!(color.value, EnumValue::Unsigned(0x4000));
        assert_eq!(color.groups, vec!["ClearBufferMask".to_owned(), "AttribMask".to_owned()]);
        assert_eq!(reg.enum_constant("GL_NEGATIVE").unwrap().value, EnumValue::Signed(-1));
        assert_eq!(reg.enum_constant("GL_ACTIVE_PROGRAM_EXT").unwrap().value, EnumValue::Unsigned(0x8B8D));
        assert_eq!(reg.enums.len(), 4);
    }

    #[test]
    fn identical_enum_redefinitions_collapse() {
        let reg = registry(
            r#"<enums><enum value="1" name="GL_ONE"/></enums>
               <enums><enum value="0x1" name="GL_ONE"/></enums>"#,
        )
        .unwrap();
        assert_eq!(reg.enums.len(), 1);
    }

    #[test]
    fn conflicting_enum_redefinition_fails() {
        let err = registry(
            r#"<enums><enum value="1" name="GL_ONE"/></enums>
               <enums><enum value="2" name="GL_ONE"/></enums>"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaIntegrity);
        assert!(err.to_string().contains("GL_ONE"), "{}", err);
    }

    #[test]
    fn reads_simple_param() {
        let ty = param_of("<param><ptype>GLbitfield</ptype> <name>mask</name></param>");
        assert_eq!(
            ty,
            TypeRef {
                name: "GLbitfield".into(),
                pointer_depth: 0,
                is_const: false
            }
        );
    }

    #[test]
    fn reads_void_pointer_param() {
        let ty = param_of("<param>const void *<name>data</name></param>");
        assert_eq!(ty.name, "void");
        assert_eq!(ty.pointer_depth, 1);
        assert!(ty.is_const);
    }

    #[test]
    fn reads_const_pointer_to_const_pointer() {
        let ty = param_of("<param>const <ptype>GLchar</ptype> *const*<name>string</name></param>");
        assert_eq!(ty.name, "GLchar");
        assert_eq!(ty.pointer_depth, 2);
        assert!(ty.is_const);
    }

    #[test]
    fn reads_raw_multiword_and_array_params() {
        let ty = param_of("<param>unsigned int <name>n</name></param>");
        assert_eq!(ty.name, "unsigned int");
        assert_eq!(ty.pointer_depth, 0);

        let ty = param_of("<param><ptype>GLfloat</ptype> <name>m</name>[16]</param>");
        assert_eq!(ty.name, "GLfloat");
        assert_eq!(ty.pointer_depth, 1);

        let ty = param_of("<param>struct <ptype>_cl_context</ptype> *<name>context</name></param>");
        assert_eq!(ty.name, "_cl_context");
        assert_eq!(ty.pointer_depth, 1);
        assert!(!ty.is_const);
    }

    #[test]
    fn reads_return_types() {
        let ty = param_of("<proto>const <ptype>GLubyte</ptype> *<name>glGetString</name></proto>");
        assert_eq!(ty.name, "GLubyte");
        assert_eq!(ty.pointer_depth, 1);
        assert!(ty.is_const);

        let ty = param_of("<proto>void <name>glFlush</name></proto>");
        assert_eq!(ty.name, "void");
        assert_eq!(ty.pointer_depth, 0);
    }

    #[test]
    fn commands_keep_param_order_and_membership() {
        let reg = registry(
            "<commands>
                <command>
                    <proto>void <name>glBufferData</name></proto>
                    <param group=\"BufferTargetARB\"><ptype>GLenum</ptype> <name>target</name></param>
                    <param><ptype>GLsizeiptr</ptype> <name>size</name></param>
                    <param len=\"size\">const void *<name>data</name></param>
                    <param><ptype>GLenum</ptype> <name>usage</name></param>
                    <alias name=\"glBufferDataARB\"/>
                </command>
            </commands>
            <feature api=\"gl\" name=\"GL_VERSION_1_5\" number=\"1.5\">
                <require><command name=\"glBufferData\"/></require>
            </feature>
            <feature api=\"gles2\" name=\"GL_ES_VERSION_2_0\" number=\"2.0\">
                <require><command name=\"glBufferData\"/></require>
            </feature>",
        )
        .unwrap();

        let cmd = reg.command("glBufferData").unwrap();
        let names: Vec<&str> = cmd.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["target", "size", "data", "usage"]);
        assert_eq!(cmd.params[2].ty.pointer_depth, 1);
        assert!(cmd.params[2].ty.is_const);
        assert_eq!(cmd.params[2].len.as_deref(), Some("size"));
        assert_eq!(cmd.params[0].group.as_deref(), Some("BufferTargetARB"));
        assert_eq!(cmd.alias.as_deref(), Some("glBufferDataARB"));
        assert_eq!(cmd.introduced_in, vec![Version::new(1, 5)]);
        assert!(cmd.removed_in.is_empty());
        assert_eq!(reg.features.len(), 1);
    }

    #[test]
    fn undeclared_ptypes_become_opaque_types() {
        let reg = registry(
            "<commands>
                <command>
                    <proto><ptype>GLsync</ptype> <name>glCreateSyncFromCLeventARB</name></proto>
                    <param>struct <ptype>_cl_context</ptype> *<name>context</name></param>
                </command>
            </commands>",
        )
        .unwrap();

        let names: Vec<&str> = reg.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["GLsync", "_cl_context"]);
        assert_eq!(reg.type_def("_cl_context").unwrap().host, HostType::Opaque);
        assert!(reg.type_def("void").is_none());
    }

    #[test]
    fn param_without_name_fails() {
        let err = registry(
            "<commands><command><proto>void <name>glBroken</name></proto><param><ptype>GLint</ptype></param></command></commands>",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaIntegrity);
    }

    #[test]
    fn features_sort_and_keep_rule_order() {
        let reg = registry(
            r#"<commands>
                <command><proto>void <name>glA</name></proto></command>
                <command><proto>void <name>glB</name></proto></command>
            </commands>
            <feature api="gl" name="GL_VERSION_2_0" number="2.0">
                <remove profile="core"><command name="glA"/></remove>
                <require><command name="glB"/></require>
            </feature>
            <feature api="gl" name="GL_VERSION_1_0" number="1.0">
                <require><command name="glA"/></require>
            </feature>"#,
        )
        .unwrap();

        assert_eq!(reg.versions(), vec![Version::new(1, 0), Version::new(2, 0)]);
        let rules = &reg.features[1].rules;
        assert_eq!(rules[0].action, Action::Remove);
        assert_eq!(rules[0].profile, Some(Profile::Core));
        assert_eq!(rules[1].action, Action::Require);
        assert_eq!(rules[1].profile, None);
        assert_eq!(reg.command("glA").unwrap().removed_in, vec![Version::new(2, 0)]);
    }

    #[test]
    fn dangling_feature_reference_fails() {
        let err = registry(
            r#"<feature api="gl" name="GL_VERSION_1_0" number="1.0">
                <require><command name="glNowhere"/></require>
            </feature>"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaIntegrity);
        let msg = err.to_string();
        assert!(msg.contains("glNowhere"), "{}", msg);
        assert!(msg.starts_with("test.xml:2:"), "{}", msg);
    }

    #[test]
    fn qualified_type_names_are_stripped() {
        let reg = registry(
            "<types><type><name>struct _cl_event</name>;</type></types>
            <commands>
                <command>
                    <proto><ptype>GLsync</ptype> <name>glCreateSyncFromCLeventARB</name></proto>
                    <param><ptype>struct _cl_event</ptype> *<name>event</name></param>
                </command>
            </commands>",
        )
        .unwrap();

        let event = reg.type_def("_cl_event").unwrap();
        assert_eq!(event.declaration, "struct _cl_event;");
        assert!(reg.type_def("struct _cl_event").is_none());

        let param = &reg.command("glCreateSyncFromCLeventARB").unwrap().params[0];
        assert_eq!(param.ty.name, "_cl_event");
        assert_eq!(param.ty.pointer_depth, 1);
        assert!(!param.ty.is_const);
        assert_eq!(reg.types.iter().filter(|t| t.name.contains("_cl_event")).count(), 1);
    }

    #[test]
    fn common_profile_blocks_apply_to_every_profile() {
        let reg = Registry::from_str(
            "test.xml",
            r#"<registry>
                <commands><command><proto>void <name>glAlphaFunc</name></proto></command></commands>
                <feature api="gles1" name="GL_VERSION_ES_CM_1_0" number="1.0">
                    <require profile="common"><command name="glAlphaFunc"/></require>
                </feature>
            </registry>"#,
            Api::Gles1,
        )
        .unwrap();

        let rules = &reg.features[0].rules;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].profile, None);
        assert!(rules[0].applies_to(Profile::Core));
        assert!(rules[0].applies_to(Profile::Compatibility));
    }

    #[test]
    fn referencing_an_unparsable_enum_fails() {
        let err = registry(
            r#"<enums><enum value="((GLint)-1)" name="GL_CAST_SENTINEL"/></enums>
            <feature api="gl" name="GL_VERSION_1_0" number="1.0">
                <require><enum name="GL_CAST_SENTINEL"/></require>
            </feature>"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaIntegrity);
        assert!(err.to_string().contains("`GL_CAST_SENTINEL`: referenced enum has no usable value"), "{}", err);
    }

    #[test]
    fn unreferenced_unparsable_enum_is_skipped() {
        let reg = registry(r#"<enums><enum value="((GLint)-1)" name="GL_CAST_SENTINEL"/></enums>"#).unwrap();
        assert!(reg.enum_constant("GL_CAST_SENTINEL").is_none());
    }

    #[test]
    fn bad_feature_number_fails() {
        let err = registry(r#"<feature api="gl" name="GL_VERSION_X" number="x.y"/>"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaIntegrity);
    }

    #[test]
    fn unsupported_extensions_are_ignored() {
        let reg = registry(
            r#"<commands><command><proto>void <name>glFooOES</name></proto></command></commands>
            <extensions>
                <extension name="GL_OES_foo" supported="gles1|gles2">
                    <require><command name="glFooOES"/></require>
                </extension>
                <extension name="GL_ARB_foo" supported="gl|glcore">
                    <require><command name="glFooOES"/></require>
                </extension>
            </extensions>"#,
        )
        .unwrap();
        assert_eq!(reg.extension_names(), vec!["GL_ARB_foo"]);
        assert_eq!(reg.command("glFooOES").unwrap().extensions, vec!["GL_ARB_foo".to_owned()]);
    }
}
