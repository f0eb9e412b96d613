use std::path::Path;

use boa_engine::{
    js_string, Context, JsError, JsNativeError, JsObject, JsResult, JsString, JsSymbol, JsValue,
    Source,
};
use precall_core::{Error, Result};

use crate::sandbox::compile::CompiledUnit;
use crate::sandbox::tag::SOURCE_TAG;
use crate::serialize::ExecutionResult;

const REQUIRE_STUB: &str = "(function require(id) { \
    throw new Error(\"Cannot find module '\" + id + \"': fragments cannot load modules\"); \
})";

/// Builds the tagging function together with the private symbol it marks
/// definitions with.
const SOURCE_TAG_FACTORY: &str = "(function () { \
    const key = Symbol('precall.source'); \
    const tag = function (definition, id) { \
        Object.defineProperty(definition, key, { value: id }); \
        return definition; \
    }; \
    return { key, tag }; \
})()";

/// One fragment's module instance: its own engine context and `module`
/// object. Nothing is registered globally, so records never observe each
/// other.
pub struct ModuleRecord {
    filename: String,
    context: Context,
    module: JsObject,
    source_key: JsSymbol,
    source_tag: JsValue,
    sources: Vec<String>,
}

impl ModuleRecord {
    pub fn new(filename: impl Into<String>) -> Result<Self> {
        let filename = filename.into();
        let mut context = Context::default();
        let module = JsObject::with_object_proto(context.intrinsics());
        let exports = JsObject::with_object_proto(context.intrinsics());
        if let Err(err) = module.set(js_string!("exports"), exports, true, &mut context) {
            return Err(Error::execution(filename, describe(err, &mut context)));
        }
        let (source_key, source_tag) = match source_tagger(&mut context) {
            Ok(tagger) => tagger,
            Err(err) => return Err(Error::execution(filename, describe(err, &mut context))),
        };
        Ok(Self {
            filename,
            context,
            module,
            source_key,
            source_tag,
            sources: Vec::new(),
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Run `unit` with the usual CommonJS bindings in scope:
    /// `exports`, `require`, `module`, `__filename` and `__dirname`.
    pub fn execute(&mut self, unit: &CompiledUnit) -> Result<()> {
        self.sources = unit.sources.clone();
        // the fragment starts on the wrapper's first line so engine positions match
        let wrapper = format!(
            "(function (exports, require, module, __filename, __dirname, {SOURCE_TAG}) {{ {}\n}})",
            unit.code
        );
        let source = Source::from_bytes(&wrapper).with_path(Path::new(self.filename.as_str()));
        let function = match self.context.eval(source) {
            Ok(function) => function,
            Err(err) => {
                let message = describe(err, &mut self.context);
                return Err(Error::compile(self.filename.clone(), message));
            }
        };
        let Some(function) = function.as_callable().cloned() else {
            return Err(Error::compile(
                self.filename.clone(),
                "module wrapper did not evaluate to a function",
            ));
        };

        let require = self
            .context
            .eval(Source::from_bytes(REQUIRE_STUB))
            .map_err(|err| self.execution_error(err))?;
        let exports = self
            .module
            .get(js_string!("exports"), &mut self.context)
            .map_err(|err| self.execution_error(err))?;
        let dirname = Path::new(&self.filename)
            .parent()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();
        let args = [
            exports,
            require,
            self.module.clone().into(),
            JsString::from(self.filename.as_str()).into(),
            JsString::from(dirname.as_str()).into(),
            self.source_tag.clone(),
        ];

        function
            .call(&JsValue::undefined(), &args, &mut self.context)
            .map_err(|err| self.execution_error(err))?;
        Ok(())
    }

    /// Classify `module.exports`.
    pub fn export_value(&mut self) -> Result<ExecutionResult> {
        let value = self
            .module
            .get(js_string!("exports"), &mut self.context)
            .map_err(|err| self.execution_error(err))?;

        if value.is_undefined() {
            return Ok(ExecutionResult::Absent);
        }
        if let Some(function) = value.as_callable() {
            let source = self
                .definition_source(function)
                .map_err(|err| self.serialization_error(&value, err))?;
            return Ok(ExecutionResult::Callable { source });
        }

        let json = self
            .stringify(&value)
            .map_err(|err| self.serialization_error(&value, err))?;
        let Some(text) = json.as_string() else {
            return Err(Error::serialization(
                self.filename.clone(),
                type_name(&value),
                "JSON.stringify produced no output",
            ));
        };
        ExecutionResult::structural(text.to_std_string_escaped())
            .map_err(|e| Error::serialization(self.filename.clone(), type_name(&value), e.to_string()))
    }

    /// Printed definition of a tagged function or class. Anything else
    /// (built-ins, bound functions) falls back to the engine's own text.
    fn definition_source(&mut self, function: &JsObject) -> JsResult<String> {
        let id = function.get(self.source_key.clone(), &mut self.context)?;
        let source = id
            .as_number()
            .filter(|id| id.fract() == 0.0 && *id >= 0.0)
            .and_then(|id| self.sources.get(id as usize));
        if let Some(source) = source {
            return Ok(source.clone());
        }
        let text = JsValue::from(function.clone()).to_string(&mut self.context)?;
        Ok(text.to_std_string_escaped())
    }

    fn stringify(&mut self, value: &JsValue) -> JsResult<JsValue> {
        let global = self.context.global_object();
        let json = global.get(js_string!("JSON"), &mut self.context)?;
        let stringify = match json.as_object() {
            Some(json) => json.get(js_string!("stringify"), &mut self.context)?,
            None => JsValue::undefined(),
        };
        let Some(stringify) = stringify.as_callable() else {
            return Err(JsNativeError::typ()
                .with_message("JSON.stringify is not available")
                .into());
        };
        stringify.call(&json, &[value.clone()], &mut self.context)
    }

    fn execution_error(&mut self, err: JsError) -> Error {
        Error::execution(self.filename.clone(), describe(err, &mut self.context))
    }

    fn serialization_error(&mut self, value: &JsValue, err: JsError) -> Error {
        Error::serialization(
            self.filename.clone(),
            type_name(value),
            describe(err, &mut self.context),
        )
    }
}

fn source_tagger(context: &mut Context) -> JsResult<(JsSymbol, JsValue)> {
    let tagger = context.eval(Source::from_bytes(SOURCE_TAG_FACTORY))?;
    let Some(tagger) = tagger.as_object() else {
        return Err(JsNativeError::typ()
            .with_message("source tagger did not evaluate to an object")
            .into());
    };
    let key = tagger.get(js_string!("key"), context)?;
    let tag = tagger.get(js_string!("tag"), context)?;
    match key.as_symbol() {
        Some(key) if tag.is_callable() => Ok((key, tag)),
        _ => Err(JsNativeError::typ()
            .with_message("source tagger is malformed")
            .into()),
    }
}

fn describe(err: JsError, context: &mut Context) -> String {
    match err.try_native(context) {
        Ok(native) => native.to_string(),
        Err(_) => err.to_string(),
    }
}

/// `typeof`, as far as serialization errors care.
fn type_name(value: &JsValue) -> &'static str {
    if value.is_undefined() {
        "undefined"
    } else if value.is_null() {
        "null"
    } else if value.is_boolean() {
        "boolean"
    } else if value.is_number() {
        "number"
    } else if value.is_string() {
        "string"
    } else if value.is_symbol() {
        "symbol"
    } else if value.is_bigint() {
        "bigint"
    } else if value.is_callable() {
        "function"
    } else {
        "object"
    }
}
