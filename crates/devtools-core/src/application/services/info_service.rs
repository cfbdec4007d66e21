//! Info Service - assembles the environment report.

use tracing::instrument;

use crate::{
    VERSION,
    application::ports::EnvironmentProbe,
    domain::{DirectoryLayout, InfoReport, InfoSection, SectionKind},
};

pub struct InfoService {
    probe: Box<dyn EnvironmentProbe>,
    layout: DirectoryLayout,
}

impl InfoService {
    pub fn new(probe: Box<dyn EnvironmentProbe>, layout: DirectoryLayout) -> Self {
        Self { probe, layout }
    }

    /// Sections in display order: Versions, Environment, Directories, URIs.
    /// Values that could not be determined are left out.
    #[instrument(skip(self))]
    pub fn report(&self) -> InfoReport {
        let facts = self.probe.probe();
        let layout = &self.layout;

        let mut versions = InfoSection::new(SectionKind::Versions);
        versions.push("DevTools Version", Some(VERSION));
        versions.push("Framework Version", facts.framework_version);

        let mut environment = InfoSection::new(SectionKind::Environment);
        environment.push("OS", facts.os);
        environment.push("PHP Version", facts.php_version);
        environment.push("PHP SAPI", facts.php_sapi);
        environment.push("PHP Bin", facts.php_binary);
        environment.push("PHP Extension Dir", facts.php_extension_dir);
        environment.push("PHP Bin Dir", facts.php_bin_dir);
        environment.push("Loaded PHP config", facts.php_ini);

        let mut directories = InfoSection::new(SectionKind::Directories);
        directories.push("DevTools Path", layout.devtools_path.clone());
        directories.push("Templates Path", layout.templates_path.clone());
        directories.push("Application Path", layout.application_path.clone());
        directories.push("Controllers Path", layout.controllers_dir.clone());
        directories.push("Models Path", layout.models_dir.clone());
        directories.push("Migrations Path", layout.migrations_dir.clone());
        directories.push("Views Path", layout.views_dir.clone());

        let mut uris = InfoSection::new(SectionKind::Uris);
        uris.push("Base URI", layout.base_uri.clone());
        uris.push(
            "WebTools URI",
            layout
                .base_uri
                .as_deref()
                .map(|base| format!("{}/webtools.php", base.trim_end_matches('/'))),
        );

        InfoReport {
            sections: vec![versions, environment, directories, uris],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockEnvironmentProbe;
    use crate::domain::HostFacts;

    fn probe(facts: HostFacts) -> Box<MockEnvironmentProbe> {
        let mut probe = MockEnvironmentProbe::new();
        probe.expect_probe().return_const(facts);
        Box::new(probe)
    }

    #[test]
    fn sections_are_ordered() {
        let report =
            InfoService::new(probe(HostFacts::default()), DirectoryLayout::default()).report();
        let kinds: Vec<_> = report.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [
                SectionKind::Versions,
                SectionKind::Environment,
                SectionKind::Directories,
                SectionKind::Uris
            ]
        );
    }

    #[test]
    fn unknown_values_are_omitted() {
        let facts = HostFacts {
            php_version: Some("8.3.4".into()),
            ..HostFacts::default()
        };
        let report = InfoService::new(probe(facts), DirectoryLayout::default()).report();

        let env = report.section(SectionKind::Environment).unwrap();
        assert_eq!(env.entries.len(), 1);
        assert_eq!(env.get("PHP Version"), Some("8.3.4"));
        assert!(report.section(SectionKind::Uris).unwrap().entries.is_empty());
        assert_eq!(
            report.section(SectionKind::Versions).unwrap().get("DevTools Version"),
            Some(VERSION)
        );
    }

    #[test]
    fn webtools_uri_joins_base_uri() {
        let layout = DirectoryLayout {
            base_uri: Some("/store/".into()),
            ..DirectoryLayout::default()
        };
        let report = InfoService::new(probe(HostFacts::default()), layout).report();
        let uris = report.section(SectionKind::Uris).unwrap();
        assert_eq!(uris.get("Base URI"), Some("/store/"));
        assert_eq!(uris.get("WebTools URI"), Some("/store/webtools.php"));
    }
}
