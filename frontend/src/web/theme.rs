//! 把本地偏好应用到 `<html>` 根元素

use reliefclaim_shared::preferences::Preferences;
use tracing::debug;
use wasm_bindgen::JsCast;

/// 设置 daisyUI 主题、页面语言和根字号
pub fn apply_preferences(prefs: &Preferences) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };

    let _ = match prefs.theme.data_theme() {
        Some(theme) => root.set_attribute("data-theme", theme),
        None => root.remove_attribute("data-theme"),
    };
    let _ = root.set_attribute("lang", prefs.language.as_str());
    if let Some(html) = root.dyn_ref::<web_sys::HtmlElement>() {
        let size = format!("{}px", prefs.font_size.root_px());
        let _ = html.style().set_property("font-size", &size);
    }
    debug!(theme = prefs.theme.as_str(), font_size = prefs.font_size.as_str(), "preferences applied");
}
