//! Rendering of the temporary runner configuration file.
//!
//! The shim never patches the project's own configuration. Instead it
//! writes a generated `ava.config.js` into a temporary directory and
//! runs the test runner from there. The generated file layers, in
//! order: the shim's fixed settings, the project's own `ava.config.js`
//! (if any), and the `ava` section of `package.json`, then changes the
//! working directory back to the project root.

use std::path::{Path, PathBuf};

/// Inputs for rendering the generated runner configuration.
#[derive(Debug)]
pub struct RunnerConfig {
    /// Absolute path of the project root; the generated config chdirs
    /// here so the runner resolves files relative to the real project.
    pub project_dir: PathBuf,

    /// The project's own `ava.config.js`, required by absolute path if
    /// present.
    pub project_config_path: Option<PathBuf>,

    /// The `ava` section of `package.json` (JSON `null` when absent).
    pub package_config: serde_json::Value,

    /// The project's `tsconfig.json`, exported to the register hook via
    /// `TS_NODE_PROJECT` if present.
    pub tsconfig_path: Option<PathBuf>,
}

impl RunnerConfig {
    /// Renders the generated `ava.config.js` source.
    ///
    /// Pure string rendering; no filesystem access.
    pub fn render(&self) -> String {
        let project_config = match &self.project_config_path {
            Some(path) => format!("require({})", js_string(path)),
            None => "null".to_string(),
        };

        let mut out = String::new();
        out.push_str(&format!("const avaConfig = {project_config};\n"));
        out.push_str(&format!(
            "const packageConfig = {};\n\n",
            self.package_config
        ));
        out.push_str(concat!(
            "const config = Object.assign({\n",
            "  \"compileEnhancements\": false,\n",
            "  \"extensions\": [\"ts\", \"tsx\"],\n",
            "  \"require\": [\"ts-node/register\"]\n",
            "}, avaConfig, packageConfig);\n\n",
            "export default config;\n\n",
        ));
        out.push_str(&format!(
            "process.chdir({});\n",
            js_string(&self.project_dir)
        ));
        if let Some(tsconfig) = &self.tsconfig_path {
            out.push_str(&format!(
                "process.env.TS_NODE_PROJECT = {};\n",
                js_string(tsconfig)
            ));
        }
        out
    }
}

/// Embeds a path as a JS string literal (JSON escaping is a subset of
/// JS string syntax).
fn js_string(path: &Path) -> String {
    serde_json::Value::String(path.to_string_lossy().into_owned()).to_string()
}
