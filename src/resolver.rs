//! Asset resolver
//!
//! Drives a catalog run over one project: load the cache, register every
//! new file type by type, extract payloads for the types that carry
//! references, then persist the catalog. The resolver owns its catalog and
//! its tracing span; nothing is shared through globals.

use crate::asset_type::AssetType;
use crate::catalog::{AssetCatalog, AssetKey, CACHE_FILE_NAME};
use crate::config::{AssetPathInfo, CONFIG_FILE_NAME, CatalogConfig};
use crate::extract::{Extractor, UnresolvedReference};
use crate::metadata::{AssetMetadata, file_mtime};
use crate::sidecar;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{Span, debug, error, info, info_span, warn};
use unity_catalog_core::{CatalogError, Result};
use unity_catalog_yaml::{ParseMode, ParseOptions, YamlDocument};
use walkdir::WalkDir;

/// Where a resolver finds its files and how it parses them
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    root: PathBuf,
    config_file: Option<PathBuf>,
    cache_file: Option<PathBuf>,
    parse_options: ParseOptions,
    span: Option<Span>,
}

impl ResolverOptions {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            config_file: None,
            cache_file: None,
            parse_options: ParseOptions::default(),
            span: None,
        }
    }

    /// Configuration document location, `<root>/asset_descriptor.json` by default
    pub fn config_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Cache file location, `<root>/asset_catalog.json` by default
    pub fn cache_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_options.mode = mode;
        self
    }

    /// Span entered for every run, in place of the default `asset_resolver` span
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.root.join(CONFIG_FILE_NAME))
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| self.root.join(CACHE_FILE_NAME))
    }
}

/// Outcome of one [`AssetResolver::process`] run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessReport {
    /// Records rehydrated from the cache without parsing
    pub cache_hits: usize,
    /// Newly registered records per type
    pub registered: BTreeMap<AssetType, usize>,
    /// Payloads extracted per type
    pub extracted: BTreeMap<AssetType, usize>,
    pub unresolved: Vec<UnresolvedReference>,
}

impl ProcessReport {
    pub fn total_registered(&self) -> usize {
        self.registered.values().sum()
    }

    pub fn registered_of(&self, asset_type: AssetType) -> usize {
        self.registered.get(&asset_type).copied().unwrap_or_default()
    }

    pub fn extracted_of(&self, asset_type: AssetType) -> usize {
        self.extracted.get(&asset_type).copied().unwrap_or_default()
    }

    /// Whether every reference found during the run resolved
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Builds and maintains the asset catalog of one project
#[derive(Debug)]
pub struct AssetResolver {
    root: PathBuf,
    config_file: PathBuf,
    parse_options: ParseOptions,
    catalog: AssetCatalog,
    span: Span,
}

impl AssetResolver {
    /// Resolver with default file locations under `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_options(ResolverOptions::new(root))
    }

    pub fn with_options(options: ResolverOptions) -> Self {
        let catalog = AssetCatalog::new(options.cache_path());
        Self::with_catalog(options, catalog)
    }

    /// Resolver working on an existing catalog; the catalog's own cache
    /// file wins over the one in `options`
    pub fn with_catalog(options: ResolverOptions, catalog: AssetCatalog) -> Self {
        let config_file = options.config_path();
        let span = options.span.unwrap_or_else(
            || info_span!("asset_resolver", root = %options.root.display()),
        );
        Self {
            root: options.root,
            config_file,
            parse_options: options.parse_options,
            catalog,
            span,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Whether the configuration document exists
    pub fn is_valid_config(&self) -> bool {
        self.config_file.is_file()
    }

    /// Write the default configuration document if none exists, using the
    /// root directory's name as catalog prefix
    pub fn create_default_config(&self) -> Result<PathBuf> {
        let project_name = self
            .root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        CatalogConfig::create_default(&self.config_file, &project_name)?;
        Ok(self.config_file.clone())
    }

    pub fn load_config(&self) -> Result<CatalogConfig> {
        if !self.is_valid_config() {
            return Err(CatalogError::config(format!(
                "No configuration document at {}",
                self.config_file.display()
            )));
        }
        CatalogConfig::load(&self.config_file)
    }

    pub fn get_asset_metadata(&self, asset_type: AssetType, key: AssetKey<'_>) -> Option<&AssetMetadata> {
        self.catalog.lookup(asset_type, key)
    }

    pub fn get_asset_metadata_by_path(&self, asset_type: AssetType, path: &str) -> Option<&AssetMetadata> {
        self.catalog.get(asset_type, path)
    }

    pub fn get_asset_metadata_by_guid(&self, asset_type: AssetType, guid: &str) -> Option<&AssetMetadata> {
        self.catalog.get_by_guid(asset_type, guid)
    }

    /// Records of one type ordered by logical path
    pub fn get_asset_metadata_list(&self, asset_type: AssetType) -> Vec<&AssetMetadata> {
        self.catalog.list(asset_type)
    }

    /// Run a full catalog pass and persist the result.
    ///
    /// Fatal errors (unreadable files, documents of unknown shape) stop the
    /// run before anything is saved, and the in-memory catalog goes back to
    /// the last saved state. Unresolved references are reported, not raised.
    pub fn process(&mut self) -> Result<ProcessReport> {
        let span = self.span.clone();
        let _entered = span.enter();
        info!("Processing catalog");

        match self.run() {
            Ok(report) => Ok(report),
            Err(e) => {
                error!("Catalog run failed: {}", e);
                let restored = self.load_cache();
                debug!("Restored {} records from the saved catalog", restored);
                Err(e)
            }
        }
    }

    fn run(&mut self) -> Result<ProcessReport> {
        let config = self.load_config()?;
        let mut report = ProcessReport {
            cache_hits: self.load_cache(),
            ..ProcessReport::default()
        };

        let mut new_assets: BTreeMap<AssetType, Vec<String>> = BTreeMap::new();
        for asset_type in AssetType::REGISTRATION_ORDER {
            let registered = self.register_type(&config, asset_type)?;
            if !registered.is_empty() {
                info!("Registered {} new {} assets", registered.len(), asset_type);
            }
            report.registered.insert(asset_type, registered.len());
            new_assets.insert(asset_type, registered);
        }

        for asset_type in AssetType::EXTRACTION_ORDER {
            let paths = new_assets.remove(&asset_type).unwrap_or_default();
            for path in &paths {
                let unresolved = self.extract_payload(&config, asset_type, path)?;
                report.unresolved.extend(unresolved);
            }
            report.extracted.insert(asset_type, paths.len());
        }

        self.catalog.save()?;
        info!(
            cache_hits = report.cache_hits,
            registered = report.total_registered(),
            unresolved = report.unresolved.len(),
            "Catalog saved to {}",
            self.catalog.cache_file().display()
        );
        Ok(report)
    }

    /// Save the catalog and release the resolver
    pub fn close(self) -> Result<()> {
        let _entered = self.span.enter();
        self.catalog.save()
    }

    /// Load the cache. An unreadable cache counts as no cache.
    fn load_cache(&mut self) -> usize {
        match self.catalog.load() {
            Ok(kept) => kept,
            Err(e) => {
                warn!("Ignoring catalog cache: {}", e);
                self.catalog.clear();
                0
            }
        }
    }

    /// Register every file of one type that the catalog does not hold yet.
    /// Returns the logical paths that were added.
    fn register_type(&mut self, config: &CatalogConfig, asset_type: AssetType) -> Result<Vec<String>> {
        let mut registered = Vec::new();
        let Some(type_config) = config.asset_type(asset_type) else {
            return Ok(registered);
        };

        for path_info in &type_config.asset_path_infos {
            for (source_file, asset_path) in self.scan(path_info, &type_config.suffixes)? {
                if self.catalog.contains(asset_type, &asset_path) {
                    continue;
                }
                let guid = sidecar::read_guid(&source_file, self.parse_options);
                let mtime = file_mtime(&source_file)?;
                debug!(asset_type = %asset_type, guid = %guid, "Registering {}", asset_path);
                self.catalog.register(AssetMetadata::new(
                    asset_type,
                    asset_path.clone(),
                    &source_file,
                    guid,
                    mtime,
                ));
                registered.push(asset_path);
            }
        }

        if asset_type == AssetType::Material {
            for (guid, info) in config.material_create_infos() {
                if self.catalog.contains(asset_type, &info.asset_path) {
                    continue;
                }
                let mtime = file_mtime(&self.config_file)?;
                debug!(guid = %guid, "Registering declared material {}", info.asset_path);
                self.catalog.register(AssetMetadata::new(
                    asset_type,
                    info.asset_path.clone(),
                    &self.config_file,
                    guid,
                    mtime,
                ));
                registered.push(info.asset_path.clone());
            }
        }
        Ok(registered)
    }

    /// Files under one scan root with a matching suffix, paired with their
    /// logical paths, in file-name order
    fn scan(&self, path_info: &AssetPathInfo, suffixes: &[String]) -> Result<Vec<(PathBuf, String)>> {
        let directory = self.root.join(&path_info.import_path);
        if !directory.is_dir() {
            debug!("Scan root {} does not exist", directory.display());
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&directory).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                CatalogError::walk(format!("Failed to walk {}: {}", directory.display(), e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&directory) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let Some(stem) = suffixes
                .iter()
                .find_map(|suffix| relative.strip_suffix(suffix.as_str()))
            else {
                continue;
            };
            found.push((entry.into_path(), logical_path(&path_info.asset_catalog_name, stem)));
        }
        Ok(found)
    }

    /// Parse one newly registered document and attach its payload
    fn extract_payload(
        &mut self,
        config: &CatalogConfig,
        asset_type: AssetType,
        asset_path: &str,
    ) -> Result<Vec<UnresolvedReference>> {
        let Some(metadata) = self.catalog.get(asset_type, asset_path) else {
            return Ok(Vec::new());
        };
        let source_file = metadata.source_path();
        debug!(asset_type = %asset_type, "Extracting {}", asset_path);

        let extracted = YamlDocument::load_yaml_with_options(&source_file, self.parse_options)
            .and_then(|doc| {
                let mut extractor =
                    Extractor::new(&self.catalog, config, asset_type, asset_path, &source_file);
                let payload = extractor.extract(&doc)?;
                Ok((payload, extractor.into_unresolved()))
            });
        let (payload, unresolved) = match extracted {
            Ok(extracted) => extracted,
            Err(e) => {
                error!(asset_type = %asset_type, "Failed to extract {}: {}", asset_path, e);
                return Err(e);
            }
        };

        if let Some(metadata) = self.catalog.get_mut(asset_type, asset_path) {
            metadata.set_payload(payload);
        }
        Ok(unresolved)
    }
}

/// Catalog prefix joined to a path relative to the scan root
fn logical_path(catalog_name: &str, relative: &str) -> String {
    let catalog_name = catalog_name.trim_matches('/');
    if catalog_name.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", catalog_name, relative)
    }
}
