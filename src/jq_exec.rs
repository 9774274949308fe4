//! jq pre-processing of loaded documents (via jaq).
//!
//! Lets a schema be pulled out of an envelope before conversion, e.g.
//! `--jq-expr '.components.schemas[]'`. Every value the filter yields is one document.
use anyhow::{Context, Result, anyhow};
use jaq_core::{Compiler, Ctx, RcIter, load};
use jaq_json::Val;
use serde_json::Value;

pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let modules = loader
        .load(&arena, load::File { code: filter_src, path: () })
        .map_err(|errors| {
            let lines = errors.iter().map(|(file, error)| format!("jq parse error in `{}`: {error:?}", file.code));
            anyhow!(lines.collect::<Vec<_>>().join("\n"))
        })?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errors| {
            let lines = errors.iter().flat_map(|(file, undefined)| {
                undefined
                    .iter()
                    .map(move |(name, kind)| format!("jq: undefined `{name}` ({kind:?}) in `{}`", file.code))
            });
            anyhow!(lines.collect::<Vec<_>>().join("\n"))
        })?;

    let inputs = RcIter::new(core::iter::empty());
    filter
        .run((Ctx::new([], &inputs), Val::from(input.clone())))
        .map(|output| {
            let output = output.map_err(|error| anyhow!("jq runtime error: {error:?}"))?;
            // jaq values print as JSON text
            let text = output.to_string();
            serde_json::from_str::<Value>(&text).with_context(|| format!("jq output is not JSON: {text}"))
        })
        .collect()
}
