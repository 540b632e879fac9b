//! FSM Sketch - round-trip finite-state machines through editable SVG.
//!
//! A catalogue of FSM descriptions is rendered to an SVG sketch whose
//! elements carry the identity of the states and transitions they draw.
//! After the sketch has been edited in a vector editor, importing it
//! recovers the moved states and reshaped curves as fragments that can be
//! merged back into the catalogue.

pub mod config;
pub mod export;
pub mod import;
pub mod report;

mod error;

pub use fsm_sketch_catalogue as catalogue;
pub use fsm_sketch_core::{curve, geometry, model};

pub use error::FsmSketchError;

use std::{fs, io, path::Path};

use log::{debug, info, trace, warn};

use fsm_sketch_catalogue::ParseConfig;
use fsm_sketch_core::model::{Catalogue, FsmDescription};

use config::AppConfig;
use export::{Exporter, svg::SvgBuilder};
use import::UpdateSet;

/// Entry point for loading catalogues, generating sketches and importing them.
///
/// # Examples
///
/// ```rust,no_run
/// use fsm_sketch::{Sketcher, config::AppConfig};
///
/// let sketcher = Sketcher::new(AppConfig::default());
///
/// let catalogue = sketcher
///     .load_catalogue("src/examples.ts")
///     .expect("Failed to load catalogue");
/// sketcher
///     .generate(&catalogue, "toggle", "fsm.svg")
///     .expect("Failed to generate");
///
/// let update = sketcher.import_file("fsm.svg").expect("Failed to import");
/// print!("{}", sketcher.report(&update));
/// ```
#[derive(Debug, Default)]
pub struct Sketcher {
    config: AppConfig,
}

impl Sketcher {
    /// Create a new sketcher with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Read and parse the catalogue stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file does not exist, `Io` if it cannot be
    /// read, and `Catalogue` if its contents do not parse.
    pub fn load_catalogue(&self, path: impl AsRef<Path>) -> Result<Catalogue, FsmSketchError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading catalogue");

        let source = read_source(path)?;
        self.parse_catalogue(&source)
    }

    /// Parse catalogue source text.
    ///
    /// # Errors
    ///
    /// Returns `Catalogue` with every diagnostic found and the source text.
    pub fn parse_catalogue(&self, source: &str) -> Result<Catalogue, FsmSketchError> {
        let parse_config = ParseConfig::new(self.config.catalogue().binding());

        let catalogue = fsm_sketch_catalogue::parse(source, &parse_config).map_err(|err| {
            debug!(
                stage:? = err.stage(),
                diagnostics = err.diagnostics().len();
                "Catalogue rejected"
            );
            FsmSketchError::new_catalogue_error(err, source)
        })?;

        debug!(examples = catalogue.len(); "Catalogue parsed successfully");
        trace!(catalogue:?; "Parsed catalogue");
        Ok(catalogue)
    }

    /// Render `fsm` to SVG text.
    ///
    /// # Errors
    ///
    /// Returns `Export` if a transition refers to a state without a position.
    pub fn render_svg(&self, fsm: &FsmDescription) -> Result<String, FsmSketchError> {
        let svg = self.svg_builder("").build();
        Ok(svg.render_fsm(fsm)?)
    }

    /// Write the sketch of example `name` to `output`.
    ///
    /// Nothing is written when the example does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ExampleNotFound` for an unknown name and `Export` if rendering
    /// or writing fails.
    pub fn generate(
        &self,
        catalogue: &Catalogue,
        name: &str,
        output: impl AsRef<Path>,
    ) -> Result<(), FsmSketchError> {
        let Some(fsm) = catalogue.get(name) else {
            warn!(example = name; "Example not found");
            return Err(FsmSketchError::ExampleNotFound {
                name: name.to_string(),
                available: catalogue.names().map(str::to_string).collect(),
            });
        };

        info!(example = name; "Generating SVG");
        let svg = self.svg_builder(output.as_ref()).build();
        svg.export_fsm(fsm)?;

        info!(example = name, file_name:? = svg.file_name(); "SVG generated successfully");
        Ok(())
    }

    /// Extract edited geometry from SVG text.
    ///
    /// # Errors
    ///
    /// Returns `SvgParse` for malformed markup and `Import` for tagged
    /// elements whose geometry cannot be read.
    pub fn import_svg(&self, source: &str) -> Result<UpdateSet, FsmSketchError> {
        let update =
            import::import(source).map_err(|err| FsmSketchError::new_import_error(err, source))?;

        if update.is_empty() {
            warn!("No tagged states or transitions found");
        } else {
            info!(
                states = update.state_count(),
                transitions = update.transitions().len();
                "SVG imported successfully"
            );
        }
        Ok(update)
    }

    /// Read `path` and extract edited geometry from it.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file does not exist, otherwise as
    /// [`Sketcher::import_svg`].
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<UpdateSet, FsmSketchError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading SVG");

        let source = read_source(path)?;
        self.import_svg(&source)
    }

    /// Render `update` as catalogue fragments.
    pub fn report(&self, update: &UpdateSet) -> String {
        report::render(update)
    }

    fn svg_builder(&self, file_name: impl AsRef<Path>) -> SvgBuilder {
        SvgBuilder::new(file_name.as_ref())
            .with_style(self.config.style())
            .with_synthesizer(self.config.curve().synthesizer())
    }
}

fn read_source(path: &Path) -> Result<String, FsmSketchError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => FsmSketchError::FileNotFound(path.to_path_buf()),
        _ => FsmSketchError::Io(err),
    })
}
