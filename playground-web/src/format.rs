//! Prettier standalone build loaded by the page shell

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use playground_core::capability::{prettier_parser, select_formatter};
use playground_core::{CodeFormatter, Language, PlaygroundError, PlaygroundResult};

/// `window.prettier` with the parsers from `window.prettierPlugins`
pub struct PrettierFormatter {
    prettier: Option<js_sys::Object>,
    plugins: JsValue,
}

fn global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

impl PrettierFormatter {
    pub fn detect() -> Self {
        Self {
            prettier: global("prettier").and_then(|value| value.dyn_into().ok()),
            plugins: global("prettierPlugins").unwrap_or(JsValue::UNDEFINED),
        }
    }

    fn options(&self, language: Language) -> Result<js_sys::Object, JsValue> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"parser".into(), &prettier_parser(language).into())?;
        js_sys::Reflect::set(&options, &"plugins".into(), &self.plugins)?;
        js_sys::Reflect::set(&options, &"tabWidth".into(), &JsValue::from_f64(2.0))?;
        Ok(options)
    }
}

impl CodeFormatter for PrettierFormatter {
    fn name(&self) -> &'static str {
        "prettier"
    }

    fn is_available(&self) -> bool {
        self.prettier.is_some()
    }

    fn format(&self, language: Language, source: &str) -> PlaygroundResult<String> {
        let prettier = self
            .prettier
            .as_ref()
            .ok_or(PlaygroundError::Unavailable("prettier"))?;
        let failed = |message: String| PlaygroundError::Format { language, message };

        let format_fn: js_sys::Function = js_sys::Reflect::get(prettier, &"format".into())
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| failed("prettier.format is missing".to_string()))?;

        let options = self
            .options(language)
            .map_err(|e| failed(format!("{:?}", e)))?;

        let formatted = format_fn
            .call2(prettier, &JsValue::from_str(source), &options)
            .map_err(|e| {
                let message = e
                    .dyn_ref::<js_sys::Error>()
                    .map(|err| String::from(err.message()))
                    .unwrap_or_else(|| format!("{:?}", e));
                failed(message)
            })?;

        formatted
            .as_string()
            .ok_or_else(|| failed("prettier returned a non-string result".to_string()))
    }
}

pub fn detect_formatter() -> Box<dyn CodeFormatter> {
    select_formatter(vec![Box::new(PrettierFormatter::detect())])
}
