//! A small ledger service documented through the library.

use std::path::PathBuf;

use apidoc_core::{
    Document, Documented, GeneratorConfig, MethodOverrides, OperationDescriptor, Service,
    TypeDescriptor, TypeRegistry, describe,
};
use clap::Args;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::info;

use crate::error::CliError;
use crate::render::{self, Format};

#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    /// Generator config (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Write the document here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// A chain block.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Block {
    /// Block height.
    pub number: i64,
    /// Block hash.
    pub hex: String,
}

/// A block header.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Header {
    /// Block height.
    pub number: i64,
    /// Hash of the parent block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Lookup of one block by height.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BlockQuery {
    /// Block height.
    #[schemars(range(min = 0))]
    pub number: i64,
}

/// A signed transfer.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Transaction {
    /// Sender address.
    #[schemars(length(min = 1, max = 64))]
    pub from: String,
    /// Recipient address.
    #[schemars(length(min = 1, max = 64))]
    pub to: String,
    /// Amount in the smallest unit.
    pub amount: u64,
}

/// Outcome of a submitted transaction.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Receipt {
    /// Transaction hash.
    pub hash: String,
    /// Height of the including block.
    pub block: i64,
}

/// The ledger service: operations, examples and placement in one place.
#[derive(Debug)]
pub struct LedgerApi {
    config: GeneratorConfig,
    registry: TypeRegistry,
    overrides: MethodOverrides,
}

impl LedgerApi {
    pub fn new(config: GeneratorConfig) -> Result<Self, CliError> {
        let block = Block {
            number: 42,
            hex: "0xdeadbeef".to_string(),
        };
        let registry = TypeRegistry::new()
            .register(&block)?
            .register(&Box::new(Block {
                hex: "0xdeadbeefPOINTER".to_string(),
                ..block
            }))?
            .register(&Header {
                number: 42,
                parent: Some("0xfeedface".to_string()),
            })?
            .register(&BlockQuery { number: 42 })?
            .register(&Transaction {
                from: "0xa11ce".to_string(),
                to: "0xb0b".to_string(),
                amount: 1_000,
            })?
            .register(&Receipt {
                hash: "0xc0ffee".to_string(),
                block: 43,
            })?;

        let mut overrides = MethodOverrides::new()
            .route("BlockHeaderAsString", "POST", "postBHaS")
            .route("SubmitTransaction", "POST", "tx");
        overrides.merge(&config.overrides);

        Ok(Self {
            config,
            registry,
            overrides,
        })
    }
}

impl Service for LedgerApi {
    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new("GetBlock")
                .input(TypeDescriptor::of::<BlockQuery>())
                .output(TypeDescriptor::of::<Block>()),
            OperationDescriptor::new("BlockToHeader")
                .input(TypeDescriptor::of::<Block>())
                .output(TypeDescriptor::of::<Header>()),
            OperationDescriptor::new("BlockHeaderAsString")
                .input(TypeDescriptor::of::<Block>())
                .input(TypeDescriptor::of::<Header>())
                .input(TypeDescriptor::named::<Box<Block>>("BlockPtr"))
                .output(TypeDescriptor::of::<String>()),
            OperationDescriptor::new("SubmitTransaction")
                .input(TypeDescriptor::of::<Transaction>())
                .output(TypeDescriptor::of::<Receipt>()),
            OperationDescriptor::new("Subscribe")
                .input(TypeDescriptor::function::<fn(&Block)>("BlockHandler"))
                .output(TypeDescriptor::anonymous::<()>()),
        ]
    }
}

impl Documented for LedgerApi {
    fn base_document(&self) -> Option<Document> {
        Some(self.config.base_document())
    }

    fn default_method(&self, operation: &str) -> String {
        self.config.default_method_for(operation)
    }

    fn default_path(&self, operation: &str) -> String {
        self.config.default_path_for(operation)
    }

    fn type_registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn method_overrides(&self) -> &MethodOverrides {
        &self.overrides
    }
}

/// Build the ledger document under `config`.
pub fn document(config: GeneratorConfig) -> Result<Document, CliError> {
    let mut resolver = config.resolver();
    let api = LedgerApi::new(config)?;
    Ok(describe(&api, &mut resolver)?)
}

fn execute(args: &SampleArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    let doc = document(config)?;
    let text = render::encode(&doc, args.format)?;
    render::emit(&text, args.output.as_deref())?;
    if let Some(path) = &args.output {
        info!(path = %path.display(), "Wrote API document.");
    }
    Ok(())
}

pub fn run(args: SampleArgs) -> i32 {
    match execute(&args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_document() {
        let doc = document(GeneratorConfig::default()).unwrap();

        assert_eq!(doc.operation_count(), 5);
        let get_block = doc.operation("GetBlock", "GET").unwrap();
        assert_eq!(get_block.parameters[0].name, "BlockQuery");
        assert!(get_block.responses.contains_key("Block"));

        let as_string = doc.operation("postBHaS", "POST").unwrap();
        assert_eq!(as_string.parameters.len(), 3);
        assert!(as_string.responses.is_empty());

        let subscribe = doc.operation("Subscribe", "GET").unwrap();
        assert!(subscribe.parameters.is_empty());
        assert!(subscribe.responses.is_empty());

        assert!(doc.schemas.contains_key("BlockPtr"));
        assert!(!doc.schemas.contains_key("BlockHandler"));
    }

    #[test]
    fn test_transaction_facets_survive() {
        let doc = document(GeneratorConfig::default()).unwrap();
        let tx = &doc.operation("tx", "POST").unwrap().parameters[0];

        assert_eq!(tx.name, "Transaction");
        assert!(tx.required);
        assert_eq!(tx.description.as_deref(), Some("A signed transfer."));
    }

    #[test]
    fn test_config_overrides_win() {
        let config = GeneratorConfig::from_toml_str(
            r##"
            default_method = "POST"
            path_prefix = "v1/"
            reference_prefix = "#/components/schemas/"

            [info]
            host = "ledger.local"

            [overrides]
            SubmitTransaction = { method = "PUT", path = "v1/transactions" }
            "##,
        )
        .unwrap();

        let doc = document(config).unwrap();

        assert_eq!(doc.info.host.as_deref(), Some("ledger.local"));
        assert!(doc.operation("v1/transactions", "PUT").is_some());
        assert!(doc.operation("tx", "POST").is_none());
        assert!(doc.operation("v1/GetBlock", "POST").is_some());
        assert!(doc.operation("postBHaS", "POST").is_some());

        let tx = &doc.operation("v1/transactions", "PUT").unwrap().parameters[0];
        assert_eq!(tx.schema.reference(), "#/components/schemas/Transaction");
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.pointer("/components/schemas/Transaction").is_some());
        assert!(json.get("definitions").is_none());
    }

    #[test]
    fn test_run_writes_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("apidoc.toml");
        let output = temp_dir.path().join("api.yaml");
        fs::write(&config, "path_prefix = \"ledger/\"\n").unwrap();

        let code = run(SampleArgs {
            config: Some(config),
            format: Format::Yaml,
            output: Some(output.clone()),
        });

        assert_eq!(code, 0);
        let value: serde_yaml::Value =
            serde_yaml::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert!(value["paths"]["ledger/GetBlock"]["GET"].is_mapping());
        assert!(value["definitions"]["Block"].is_mapping());
    }

    #[test]
    fn test_run_reports_bad_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("apidoc.toml");
        fs::write(&config, "unknown_key = 1\n").unwrap();

        let code = run(SampleArgs {
            config: Some(config),
            format: Format::Json,
            output: None,
        });

        assert_eq!(code, 1);
    }
}
