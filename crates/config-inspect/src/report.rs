//! Tenant report assembly.
//!
//! The report has three sections, each generated from a classified tenant:
//! networking (one subsection per VRF), EPGs and contracts. Diagrams are
//! written through an [`ImageWriter`] and embedded by their path relative to
//! the document. Nothing is saved until the whole document has been built.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use tenantdoc_common::{FabricError, FabricResult};
use tenantdoc_config::{ConfigExport, Inventory, ManagedObject};

use crate::document::{
    Document, DocumentFormat, STYLE_LIST_BULLET, STYLE_LIST_BULLET_2, STYLE_NORMAL,
};
use crate::graph::{self, GraphModel};
use crate::heuristics::{self, Severity};
use crate::image::{self, ImageWriter};
use crate::relations;
use crate::settings::ReportSettings;

const NOT_AVAILABLE: &str = "N/A";

const NO_VRFS: &str = "This tenant has no private networks (VRFs) defined, it is probably \
                       using a private network defined in the common tenant.";

/// A built report: the document and the diagram files written for it.
#[derive(Debug, Clone)]
pub struct Report {
    pub document: Document,
    pub images: Vec<PathBuf>,
}

/// Builds the report document for one tenant.
pub struct ReportBuilder<'a> {
    settings: &'a ReportSettings,
    images: &'a dyn ImageWriter,
    document_dir: PathBuf,
}

/// `"<name>. <label>: a, b"`, or `N/A` when there are no items.
fn member_line<I, S>(name: &str, label: &str, items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<S> = items.into_iter().collect();
    if items.is_empty() {
        format!("{}. {}: {}", name, label, NOT_AVAILABLE)
    } else {
        format!("{}. {}: {}", name, label, join(&items))
    }
}

/// Lexical components of `path`, with `.` dropped and `..` folded.
fn normalized(path: &Path) -> Vec<Component<'_>> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(parts.last(), Some(Component::Normal(_))) => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts
}

/// `path` relative to the directory `base`.
///
/// Both must be absolute or both relative; otherwise `path` is returned
/// unchanged.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() != base.is_absolute() {
        return path.to_path_buf();
    }
    let path_parts = normalized(path);
    let base_parts = normalized(base);
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push(Component::ParentDir);
    }
    for part in &path_parts[common..] {
        relative.push(part);
    }
    relative
}

fn absolute(path: &Path) -> FabricResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| FabricError::io(".", e))?;
    Ok(cwd.join(path))
}

fn join<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

impl<'a> ReportBuilder<'a> {
    pub fn new(settings: &'a ReportSettings, images: &'a dyn ImageWriter) -> Self {
        Self {
            settings,
            images,
            document_dir: PathBuf::from("."),
        }
    }

    /// Directory the document will be saved in; pictures are referenced
    /// relative to it. Defaults to the working directory.
    pub fn with_document_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.document_dir = dir.into();
        self
    }

    /// Build the full report for a classified tenant.
    pub fn build(&self, inventory: &Inventory<'_>) -> FabricResult<Report> {
        let mut report = Report {
            document: Document::new(),
            images: Vec::new(),
        };
        report.document.register_style(self.settings.style.clone())?;
        report.document.add_heading(
            format!("ACI Configuration for tenant {}", inventory.tenant_name),
            0,
        )?;

        self.networking_section(&mut report, inventory)?;
        self.epg_section(&mut report, inventory)?;
        self.contract_section(&mut report, inventory)?;

        info!(
            tenant = inventory.tenant_name,
            blocks = report.document.blocks().len(),
            images = report.images.len(),
            "Built tenant report"
        );
        Ok(report)
    }

    fn body(&self, report: &mut Report, text: impl Into<String>) -> FabricResult<()> {
        report.document.add_paragraph(text, &self.settings.style.name)
    }

    fn diagram(&self, report: &mut Report, graph: &GraphModel) -> FabricResult<()> {
        let path = self.settings.image_path(&graph.name, self.images.format());
        self.images.write_image(graph, &path)?;
        report.document.add_picture(
            relative_to(&path, &self.document_dir),
            self.settings.picture_width_cm,
        );
        report.images.push(path);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Networking
    // ------------------------------------------------------------------------

    fn networking_section(&self, report: &mut Report, inventory: &Inventory<'_>) -> FabricResult<()> {
        report.document.add_heading("Networking configuration", 1)?;
        report.document.add_heading("Private networks (VRFs)", 2)?;

        if inventory.contexts.is_empty() {
            return self.body(report, NO_VRFS);
        }
        self.body(
            report,
            "This tenant has the following private networks (VRFs) defined:",
        )?;

        for ctx in &inventory.contexts {
            let name = ctx.name();
            debug!(vrf = name, "Documenting VRF");
            report.document.add_heading(name, 3)?;

            self.vrf_bridge_domains(report, inventory, name)?;
            self.vrf_l3outs(report, inventory, name)?;

            if let Some(graph) = graph::context_graph(inventory, name) {
                self.diagram(report, &graph)?;
            }
        }
        Ok(())
    }

    fn vrf_bridge_domains(
        &self,
        report: &mut Report,
        inventory: &Inventory<'_>,
        ctx: &str,
    ) -> FabricResult<()> {
        let bds = relations::bridge_domains_for_context(&inventory.bridge_domains, ctx);
        if bds.is_empty() {
            return self.body(report, "No bridge domains associated to this VRF.");
        }

        self.body(report, "The following bridge domains are defined in this VRF:")?;
        for bd in &bds {
            let subnets = relations::subnets_for_bridge_domain(&inventory.bridge_domains, bd);
            report
                .document
                .add_paragraph(member_line(bd, "subnets", subnets), STYLE_LIST_BULLET)?;
        }
        Ok(())
    }

    fn vrf_l3outs(&self, report: &mut Report, inventory: &Inventory<'_>, ctx: &str) -> FabricResult<()> {
        let l3outs = relations::l3outs_for_context(&inventory.l3outs, ctx);
        if l3outs.is_empty() {
            return self.body(report, "No external IP connections associated to this VRF.");
        }

        self.body(
            report,
            "The following external IP connections are associated to this VRF:",
        )?;
        for l3out in &l3outs {
            let routes = relations::static_routes(&inventory.l3outs, l3out);
            report
                .document
                .add_paragraph(member_line(l3out, "static routes", routes), STYLE_LIST_BULLET)?;

            let named: Vec<&ManagedObject> = inventory
                .l3outs
                .iter()
                .copied()
                .filter(|o| o.name() == l3out)
                .collect();
            let details = [
                (
                    "exported subnets",
                    named
                        .iter()
                        .flat_map(|o| relations::l3out_export_subnets(o))
                        .collect::<Vec<_>>(),
                ),
                (
                    "imported subnets",
                    named
                        .iter()
                        .flat_map(|o| relations::l3out_import_subnets(o))
                        .collect::<Vec<_>>(),
                ),
                (
                    "consumed contracts",
                    named
                        .iter()
                        .flat_map(|o| relations::l3out_consumed_contracts(o))
                        .collect::<Vec<_>>(),
                ),
            ];
            for (label, items) in details {
                if !items.is_empty() {
                    report
                        .document
                        .add_paragraph(format!("{}: {}", label, join(&items)), STYLE_LIST_BULLET_2)?;
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // EPGs
    // ------------------------------------------------------------------------

    fn epg_section(&self, report: &mut Report, inventory: &Inventory<'_>) -> FabricResult<()> {
        report.document.add_heading("EPGs", 1)?;
        if inventory.epgs.is_empty() {
            return self.body(report, "This tenant has no EPGs defined.");
        }
        self.body(report, "The following EPGs are defined in this tenant:")?;

        for epg in &inventory.epgs {
            debug!(epg = epg.name(), "Documenting EPG");
            report.document.add_heading(format!("EPG {}", epg.name()), 2)?;

            match relations::bridge_domain_for_epg(epg) {
                Some(bd) => report
                    .document
                    .add_paragraph(format!("Bridge Domain: {}", bd), STYLE_NORMAL)?,
                None => self.body(report, "No bridge domain associated to this EPG.")?,
            }

            let paths = relations::epg_paths(epg);
            if paths.is_empty() {
                self.body(report, "No static paths defined for this EPG.")?;
            } else {
                report.document.add_paragraph("Path:", STYLE_NORMAL)?;
                for path in &paths {
                    report
                        .document
                        .add_paragraph(path.to_string(), STYLE_LIST_BULLET)?;
                }
            }

            for (title, contracts) in [
                ("Consumed contracts:", relations::epg_consumed_contracts(epg)),
                ("Provided contracts:", relations::epg_provided_contracts(epg)),
            ] {
                if contracts.is_empty() {
                    continue;
                }
                report.document.add_paragraph(title, STYLE_NORMAL)?;
                for contract in contracts {
                    report.document.add_paragraph(contract, STYLE_LIST_BULLET)?;
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Contracts
    // ------------------------------------------------------------------------

    fn contract_section(&self, report: &mut Report, inventory: &Inventory<'_>) -> FabricResult<()> {
        report.document.add_heading("Contracts", 1)?;
        if inventory.contracts.is_empty() {
            return self.body(report, "This tenant has no contracts defined.");
        }
        self.body(report, "The following contracts are defined in this tenant:")?;

        for contract in &inventory.contracts {
            let name = contract.name();
            debug!(contract = name, "Documenting contract");
            report.document.add_heading(format!("Contract {}", name), 2)?;

            let epgs = relations::epgs_for_contract(&inventory.epgs, name);
            if epgs.is_empty() {
                self.body(report, "This contract is not used by EPGs.")?;
            } else {
                self.body(report, "The following EPGs use this contract:")?;
                for epg in &epgs {
                    report
                        .document
                        .add_paragraph(format!("EPG {}", epg), STYLE_LIST_BULLET)?;
                }

                for (title, users) in [
                    ("Provided by:", relations::epgs_providing(&inventory.epgs, name)),
                    ("Consumed by:", relations::epgs_consuming(&inventory.epgs, name)),
                ] {
                    if users.is_empty() {
                        continue;
                    }
                    self.body(report, title)?;
                    for user in users {
                        report.document.add_paragraph(user, STYLE_LIST_BULLET)?;
                    }
                }
            }

            let l3outs = relations::l3outs_for_contract(&inventory.l3outs, name);
            if l3outs.is_empty() {
                self.body(report, "This contract is not used by L3 Outs.")?;
            } else {
                self.body(report, "The following L3 Outs use this contract:")?;
                for l3out in &l3outs {
                    report
                        .document
                        .add_paragraph(format!("L3 Out {}", l3out), STYLE_LIST_BULLET)?;
                }
            }

            self.diagram(report, &graph::contract_graph(inventory, name))?;
        }
        Ok(())
    }
}

/// Load an export, build its report and save it to `output`.
///
/// Heuristic findings are logged but never stop the run. The output file is
/// only written once the whole document has been built.
pub fn generate(
    settings: &ReportSettings,
    input: &Path,
    output: &Path,
    format: DocumentFormat,
) -> FabricResult<Report> {
    let export = ConfigExport::from_file(input)?;
    let tenant = export.tenant()?;
    let inventory = Inventory::classify(tenant);

    for finding in heuristics::analyze(&inventory) {
        match finding.severity {
            Severity::Error | Severity::Warn => {
                warn!(code = %finding.code, "{}", finding.message)
            }
            Severity::Info => info!(code = %finding.code, "{}", finding.message),
        }
    }

    let settings = ReportSettings {
        image_dir: absolute(&settings.image_dir)?,
        ..settings.clone()
    };
    let document_dir = absolute(output.parent().unwrap_or_else(|| Path::new("")))?;

    std::fs::create_dir_all(&settings.image_dir)
        .map_err(|e| FabricError::io(&settings.image_dir, e))?;
    let writer = image::writer_for(settings.image_format, &settings.graphviz_program);

    let report = ReportBuilder::new(&settings, writer.as_ref())
        .with_document_dir(document_dir)
        .build(&inventory)?;
    report.document.save(output, format)?;
    Ok(report)
}
