// ─── Descriptor Model ───
// Typed view of a JNLP document. Only the subset needed to launch an
// application is modelled; unknown elements and attributes are ignored.

use serde::Deserialize;

use crate::core::platform::filter_matches;

/// Root `<jnlp>` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Descriptor {
    #[serde(rename = "@spec", default)]
    pub spec: Option<String>,
    #[serde(rename = "@codebase", default)]
    pub codebase: Option<String>,
    #[serde(rename = "information", default)]
    pub information: Vec<Information>,
    #[serde(rename = "resources", default)]
    pub resources: Vec<ResourceGroup>,
    #[serde(rename = "private_jre", default)]
    pub private_runtimes: Vec<PrivateRuntime>,
    #[serde(rename = "application-desc", default)]
    pub application: Option<ApplicationDesc>,
    #[serde(rename = "applet-desc", default)]
    pub applet: Option<AppletDesc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Information {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub homepage: Option<Homepage>,
    #[serde(rename = "description", default)]
    pub descriptions: Vec<Description>,
    #[serde(rename = "icon", default)]
    pub icons: Vec<Icon>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Description {
    #[serde(rename = "@kind", default)]
    pub kind: Option<String>,
    #[serde(rename = "$text", default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Homepage {
    #[serde(rename = "@href", default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Icon {
    #[serde(rename = "@href", default)]
    pub href: Option<String>,
}

/// A platform-filtered `<resources>` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceGroup {
    #[serde(rename = "@os", default)]
    pub os: Option<String>,
    #[serde(rename = "@arch", default)]
    pub arch: Option<String>,
    #[serde(rename = "j2se", default)]
    pub j2se: Vec<RuntimeHint>,
    #[serde(rename = "java", default)]
    pub java: Vec<RuntimeHint>,
    #[serde(rename = "jar", default)]
    pub jars: Vec<ArtifactRef>,
    #[serde(rename = "nativelib", default)]
    pub nativelibs: Vec<ArtifactRef>,
    #[serde(rename = "extension", default)]
    pub extensions: Vec<ArtifactRef>,
}

/// `<j2se>` / `<java>` element: runtime version and heap hints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeHint {
    #[serde(rename = "@href", default)]
    pub href: Option<String>,
    #[serde(rename = "@version", default)]
    pub version: Option<String>,
    #[serde(rename = "@max-heap-size", default)]
    pub max_heap_size: Option<String>,
}

/// `<jar>`, `<nativelib>` or `<extension>` reference. The element name
/// decides the [`ArtifactKind`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactRef {
    #[serde(rename = "@href", default)]
    pub href: String,
}

/// `<private_jre>`: a self-extracting runtime with its own platform filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrivateRuntime {
    #[serde(rename = "@os", default)]
    pub os: Option<String>,
    #[serde(rename = "@arch", default)]
    pub arch: Option<String>,
    #[serde(rename = "@href", default)]
    pub href: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationDesc {
    #[serde(rename = "@main-class", default)]
    pub main_class: Option<String>,
    #[serde(rename = "argument", default)]
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppletDesc {
    #[serde(rename = "@main-class", default)]
    pub main_class: Option<String>,
    #[serde(rename = "param", default)]
    pub params: Vec<Param>,
}

/// Applet parameter. The element text is used when present, otherwise the
/// `value` attribute.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Param {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@value", default)]
    pub value: Option<String>,
    #[serde(rename = "$text", default)]
    pub text: String,
}

impl Param {
    pub fn launch_text(&self) -> String {
        match non_empty(Some(self.text.as_str())) {
            Some(text) => text.to_string(),
            None => self.value.clone().unwrap_or_default(),
        }
    }
}

/// How a fetched artifact is handled after download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Jar,
    NativeLibrary,
    Extension,
    PrivateRuntime,
}

impl ArtifactKind {
    pub fn unpacks(self) -> bool {
        matches!(self, ArtifactKind::NativeLibrary)
    }

    pub fn self_extracts(self) -> bool {
        matches!(self, ArtifactKind::PrivateRuntime)
    }
}

/// The entry point the launched process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    Application {
        main_class: String,
        arguments: Vec<String>,
    },
    Applet {
        main_class: String,
        params: Vec<String>,
    },
}

impl LaunchTarget {
    pub fn main_class(&self) -> &str {
        match self {
            LaunchTarget::Application { main_class, .. } => main_class,
            LaunchTarget::Applet { main_class, .. } => main_class,
        }
    }

    /// Ordered argument or parameter texts passed after the main class.
    pub fn arguments(&self) -> &[String] {
        match self {
            LaunchTarget::Application { arguments, .. } => arguments,
            LaunchTarget::Applet { params, .. } => params,
        }
    }
}

/// Runtime hints collected from the active groups of the root descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeHints {
    pub version: Option<String>,
    pub max_heap_size: Option<String>,
}

impl RuntimeHints {
    /// Later non-empty values replace earlier ones.
    pub fn merge(&mut self, other: RuntimeHints) {
        if other.version.is_some() {
            self.version = other.version;
        }
        if other.max_heap_size.is_some() {
            self.max_heap_size = other.max_heap_size;
        }
    }
}

impl Descriptor {
    /// First `<information>` block, if any.
    pub fn information(&self) -> Option<&Information> {
        self.information.first()
    }

    /// Application entry point when present, otherwise the applet one.
    pub fn launch_target(&self) -> Option<LaunchTarget> {
        if let Some(app) = &self.application {
            if let Some(main_class) = non_empty(app.main_class.as_deref()) {
                return Some(LaunchTarget::Application {
                    main_class: main_class.to_string(),
                    arguments: app.arguments.clone(),
                });
            }
        }

        let applet = self.applet.as_ref()?;
        let main_class = non_empty(applet.main_class.as_deref())?;
        Some(LaunchTarget::Applet {
            main_class: main_class.to_string(),
            params: applet.params.iter().map(Param::launch_text).collect(),
        })
    }

    /// Resource groups whose platform filter accepts `os`/`arch`.
    pub fn active_groups<'a>(
        &'a self,
        os: &'a str,
        arch: &'a str,
    ) -> impl Iterator<Item = &'a ResourceGroup> + 'a {
        self.resources.iter().filter(move |g| g.is_active(os, arch))
    }

    /// First private runtime whose platform filter accepts `os`/`arch`.
    pub fn active_private_runtime(&self, os: &str, arch: &str) -> Option<&PrivateRuntime> {
        self.private_runtimes
            .iter()
            .find(|jre| jre.is_active(os, arch) && !jre.href.trim().is_empty())
    }
}

impl ResourceGroup {
    pub fn is_active(&self, os: &str, arch: &str) -> bool {
        filter_matches(self.os.as_deref(), os) && filter_matches(self.arch.as_deref(), arch)
    }

    /// Heap and version hints of this group: the last non-empty `<j2se>`
    /// value, falling back to `<java>`.
    pub fn runtime_hints(&self) -> RuntimeHints {
        fn last_non_empty<'a>(
            hints: &'a [RuntimeHint],
            field: impl Fn(&'a RuntimeHint) -> Option<&'a str>,
        ) -> Option<String> {
            hints
                .iter()
                .rev()
                .find_map(|h| non_empty(field(h)))
                .map(ToString::to_string)
        }

        let version = last_non_empty(&self.j2se, |h| h.version.as_deref())
            .or_else(|| last_non_empty(&self.java, |h| h.version.as_deref()));
        let max_heap_size = last_non_empty(&self.j2se, |h| h.max_heap_size.as_deref())
            .or_else(|| last_non_empty(&self.java, |h| h.max_heap_size.as_deref()));

        RuntimeHints {
            version,
            max_heap_size,
        }
    }
}

impl PrivateRuntime {
    pub fn is_active(&self, os: &str, arch: &str) -> bool {
        filter_matches(self.os.as_deref(), os) && filter_matches(self.arch.as_deref(), arch)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(os: Option<&str>, arch: Option<&str>) -> ResourceGroup {
        ResourceGroup {
            os: os.map(Into::into),
            arch: arch.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn platform_filter_truth_table() {
        let filters = [None, Some(""), Some("linux"), Some("LINUX"), Some("Windows")];
        let arches = [None, Some(""), Some("amd64"), Some("AMD64"), Some("x86")];

        for filter_os in filters {
            for filter_arch in arches {
                for (run_os, run_arch) in [("Linux", "amd64"), ("Windows", "x86")] {
                    let os_ok = match filter_os {
                        None | Some("") => true,
                        Some(f) => f.eq_ignore_ascii_case(run_os),
                    };
                    let arch_ok = match filter_arch {
                        None | Some("") => true,
                        Some(f) => f.eq_ignore_ascii_case(run_arch),
                    };
                    assert_eq!(
                        group(filter_os, filter_arch).is_active(run_os, run_arch),
                        os_ok && arch_ok,
                        "os={:?} arch={:?} on {}/{}",
                        filter_os,
                        filter_arch,
                        run_os,
                        run_arch
                    );
                }
            }
        }
    }

    #[test]
    fn application_wins_over_applet() {
        let descriptor = Descriptor {
            application: Some(ApplicationDesc {
                main_class: Some("app.Main".into()),
                arguments: vec!["-a".into()],
            }),
            applet: Some(AppletDesc {
                main_class: Some("applet.Main".into()),
                params: vec![Param {
                    text: "p".into(),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        };

        let target = descriptor.launch_target().unwrap();
        assert_eq!(target.main_class(), "app.Main");
        assert_eq!(target.arguments(), ["-a".to_string()]);
    }

    #[test]
    fn applet_used_when_application_has_no_main_class() {
        let descriptor = Descriptor {
            application: Some(ApplicationDesc::default()),
            applet: Some(AppletDesc {
                main_class: Some("applet.Main".into()),
                params: vec![
                    Param {
                        text: "p1".into(),
                        ..Default::default()
                    },
                    Param {
                        name: Some("mode".into()),
                        value: Some("fast".into()),
                        ..Default::default()
                    },
                ],
            }),
            ..Default::default()
        };

        let target = descriptor.launch_target().unwrap();
        assert!(matches!(target, LaunchTarget::Applet { .. }));
        assert_eq!(target.arguments(), ["p1".to_string(), "fast".to_string()]);
    }

    #[test]
    fn no_entry_point_yields_none() {
        assert!(Descriptor::default().launch_target().is_none());
    }

    #[test]
    fn runtime_hints_prefer_j2se_then_java() {
        let mut g = group(None, None);
        g.j2se = vec![
            RuntimeHint {
                max_heap_size: Some("256m".into()),
                ..Default::default()
            },
            RuntimeHint {
                version: Some("1.8+".into()),
                max_heap_size: Some("512m".into()),
                ..Default::default()
            },
        ];
        g.java = vec![RuntimeHint {
            max_heap_size: Some("1g".into()),
            ..Default::default()
        }];

        let hints = g.runtime_hints();
        assert_eq!(hints.max_heap_size.as_deref(), Some("512m"));
        assert_eq!(hints.version.as_deref(), Some("1.8+"));

        g.j2se.clear();
        assert_eq!(g.runtime_hints().max_heap_size.as_deref(), Some("1g"));
    }

    #[test]
    fn merging_hints_keeps_earlier_values_when_later_are_empty() {
        let mut hints = RuntimeHints {
            version: Some("1.8".into()),
            max_heap_size: Some("512m".into()),
        };
        hints.merge(RuntimeHints {
            version: None,
            max_heap_size: Some("2g".into()),
        });
        assert_eq!(hints.version.as_deref(), Some("1.8"));
        assert_eq!(hints.max_heap_size.as_deref(), Some("2g"));
    }

    #[test]
    fn private_runtime_selection_respects_filter() {
        let descriptor = Descriptor {
            private_runtimes: vec![
                PrivateRuntime {
                    os: Some("Windows".into()),
                    arch: Some("x86".into()),
                    href: "jre/win32.exe".into(),
                },
                PrivateRuntime {
                    os: Some("windows".into()),
                    arch: Some("amd64".into()),
                    href: "jre/win64.exe".into(),
                },
            ],
            ..Default::default()
        };

        let jre = descriptor.active_private_runtime("Windows", "AMD64").unwrap();
        assert_eq!(jre.href, "jre/win64.exe");
        assert!(descriptor.active_private_runtime("Linux", "amd64").is_none());
    }
}
