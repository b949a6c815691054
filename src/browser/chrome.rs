//! The browser-like chrome drawn around the embedded page: URL field,
//! Go/Back/Forward/Reload buttons, window buttons, loading bar and the error
//! banner.

use serde::Serialize;

use crate::browser::banner::{Banner, BannerId};

/// Enabled state of the back/forward controls. Derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// UI surface the navigation manager drives.
pub trait Chrome {
    fn set_address(&mut self, url: &str);

    fn set_controls(&mut self, controls: Controls);

    fn set_loading(&mut self, loading: bool);

    /// Shows `banner`, replacing whatever banner is visible. The
    /// implementation arranges for `NavigationManager::dismiss_banner` to be
    /// called once `banner.ttl` has elapsed.
    fn show_banner(&mut self, banner: &Banner);

    fn hide_banner(&mut self, id: BannerId);

    /// Ask the user whether to leave the app (mobile back button with no
    /// history left).
    fn confirm_exit(&mut self);
}

/// What the injected chrome renders, fixed per host shell.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeOptions {
    /// Minimize/maximize/close buttons (frameless desktop windows).
    pub window_buttons: bool,
    /// Route the Escape / BrowserBack keys to the hardware back handler.
    pub back_key: bool,
    pub exit_prompt: String,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            window_buttons: true,
            back_key: false,
            exit_prompt: "Are you sure you want to exit the app?".to_string(),
        }
    }
}

/// Script that calls `method` on the page-side chrome object, if present.
pub fn js_call(method: &str, arg: &impl Serialize) -> String {
    let arg = serde_json::to_string(arg).unwrap_or_else(|_| "null".to_string());
    format!("window.__webshell && window.__webshell.{method}({arg});")
}

/// Initialization script injected into every document. Renders the chrome,
/// reports lifecycle events over `window.ipc` and exposes `window.__webshell`
/// so the host can push state back.
pub fn chrome_script(options: &ChromeOptions) -> String {
    let template = r#"
(function() {
  if (window.__webshell) return;

  function post(op, payload) {
    try {
      var msg = { op: op };
      if (payload !== undefined) msg.payload = payload;
      window.ipc.postMessage(JSON.stringify(msg));
    } catch (_) { /* ipc not ready */ }
  }

  var options = {OPTIONS};
  var state = { address: location.href, controls: { canGoBack: false, canGoForward: false }, loading: true, banner: null };
  var els = {};

  function mkBtn(id, text, title, onClick) {
    var b = document.createElement('button');
    b.id = id; b.textContent = text; b.title = title;
    b.style.cssText = 'width:32px;height:32px;border:none;background:#2a2a2a;color:#e6e6e6;border-radius:6px;cursor:pointer;display:flex;align-items:center;justify-content:center;font-size:14px;';
    b.addEventListener('mouseenter', function(){ if (!this.disabled) this.style.background = '#3a3a3a'; });
    b.addEventListener('mouseleave', function(){ this.style.background = '#2a2a2a'; });
    b.addEventListener('click', onClick);
    return b;
  }

  function render() {
    if (!els.bar) return;
    if (document.activeElement !== els.addr) els.addr.value = state.address;
    els.back.disabled = !state.controls.canGoBack;
    els.fwd.disabled = !state.controls.canGoForward;
    els.back.style.opacity = els.back.disabled ? '0.4' : '1';
    els.fwd.style.opacity = els.fwd.disabled ? '0.4' : '1';
    els.progress.style.display = state.loading ? 'block' : 'none';
    if (state.banner) {
      els.banner.textContent = state.banner.message;
      els.banner.dataset.id = String(state.banner.id);
      els.banner.style.display = 'block';
    } else {
      els.banner.style.display = 'none';
    }
  }

  function submit() {
    post('navigate', { url: els.addr.value });
  }

  function ensureChrome() {
    if (document.getElementById('webshell-chrome')) return;

    var bar = document.createElement('div');
    bar.id = 'webshell-chrome';
    bar.style.cssText = 'position:fixed;top:0;left:0;right:0;height:44px;background:rgba(30,30,30,0.97);border-bottom:1px solid #2a2a2a;display:flex;align-items:center;gap:8px;padding:0 8px;z-index:2147483647;box-shadow:0 2px 8px rgba(0,0,0,0.35);font-family:-apple-system,BlinkMacSystemFont,Segoe UI,Roboto,Helvetica,Arial,sans-serif;';

    els.back = mkBtn('webshell-back', '←', 'Back', function(){ post('back'); });
    els.fwd = mkBtn('webshell-forward', '→', 'Forward', function(){ post('forward'); });
    els.reload = mkBtn('webshell-reload', '⟳', 'Reload', function(){ post('reload'); });
    els.addr = document.createElement('input');
    els.addr.id = 'webshell-url';
    els.addr.placeholder = 'Enter address';
    els.addr.style.cssText = 'flex:1;height:32px;padding:0 10px;border-radius:6px;border:1px solid #2a2a2a;background:#1b1b1b;color:#e6e6e6;outline:none;font-size:13px;';
    els.addr.addEventListener('keydown', function(e) {
      if (e.key === 'Enter') { e.preventDefault(); submit(); }
    });
    els.go = mkBtn('webshell-go', 'Go', 'Go', submit);

    bar.appendChild(els.back); bar.appendChild(els.fwd); bar.appendChild(els.reload);
    bar.appendChild(els.addr); bar.appendChild(els.go);

    if (options.windowButtons) {
      bar.appendChild(mkBtn('webshell-minimize', '–', 'Minimize', function(){ post('minimize'); }));
      bar.appendChild(mkBtn('webshell-maximize', '□', 'Maximize', function(){ post('maximize'); }));
      bar.appendChild(mkBtn('webshell-close', '✕', 'Close', function(){ post('close'); }));
    }

    els.progress = document.createElement('div');
    els.progress.id = 'webshell-loading';
    els.progress.style.cssText = 'position:absolute;left:0;right:0;bottom:-2px;height:2px;background:#3a83f7;display:none;';
    bar.appendChild(els.progress);

    els.banner = document.createElement('div');
    els.banner.id = 'webshell-banner';
    els.banner.style.cssText = 'position:fixed;top:52px;left:50%;transform:translateX(-50%);max-width:80vw;padding:10px 16px;border-radius:6px;background:#c0392b;color:#fff;font-size:13px;z-index:2147483647;display:none;font-family:-apple-system,BlinkMacSystemFont,Segoe UI,Roboto,Helvetica,Arial,sans-serif;';

    if (options.windowButtons) {
      bar.addEventListener('mousedown', function(e) {
        if (e.target === bar && e.button === 0) post('drag-window');
      });
    }

    document.documentElement.appendChild(bar);
    document.documentElement.appendChild(els.banner);
    els.bar = bar;

    var body = document.body;
    if (body) {
      var current = parseInt((body.style.paddingTop || '0').replace('px', '')) || 0;
      if (current < 44) body.style.paddingTop = '44px';
    }

    render();
    post('chrome-ready');
  }

  window.__webshell = {
    setAddress: function(url) {
      state.address = url;
      if (els.addr) els.addr.value = url;
      render();
    },
    setControls: function(c) { state.controls = c; render(); },
    setLoading: function(loading) { state.loading = loading; render(); },
    showBanner: function(banner) { state.banner = banner; render(); },
    hideBanner: function(id) {
      if (state.banner && state.banner.id === id) { state.banner = null; render(); }
    },
    confirmExit: function() {
      if (window.confirm(options.exitPrompt)) post('exit-confirmed');
    }
  };

  post('did-start-loading');

  if (options.backKey) {
    document.addEventListener('keydown', function(e) {
      if (e.key === 'Escape' || e.key === 'BrowserBack' || e.key === 'GoBack') {
        if (document.activeElement === els.addr) return;
        e.preventDefault();
        post('hardware-back');
      }
    });
  }

  // about:blank and data: placeholders are not part of the visible history.
  function reportLocation() {
    if (location.protocol === 'http:' || location.protocol === 'https:') {
      post('did-navigate', { url: location.href });
    }
  }

  window.addEventListener('popstate', reportLocation);
  window.addEventListener('hashchange', reportLocation);
  window.addEventListener('load', function() { post('did-stop-loading'); });

  function onReady() {
    ensureChrome();
    reportLocation();
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', onReady, { once: true });
  } else {
    onReady();
    if (document.readyState === 'complete') post('did-stop-loading');
  }
})();
"#;
    let options = serde_json::to_string(options).unwrap_or_else(|_| "{}".to_string());
    template.replace("{OPTIONS}", &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_call_escapes_arguments() {
        let script = js_call("setAddress", &"https://example.org/\"quoted\"");
        assert_eq!(
            script,
            r#"window.__webshell && window.__webshell.setAddress("https://example.org/\"quoted\"");"#
        );
    }

    #[test]
    fn controls_serialize_for_the_page() {
        let script = js_call(
            "setControls",
            &Controls {
                can_go_back: true,
                can_go_forward: false,
            },
        );
        assert!(script.contains(r#"{"canGoBack":true,"canGoForward":false}"#));
    }

    #[test]
    fn script_embeds_options() {
        let script = chrome_script(&ChromeOptions {
            window_buttons: false,
            back_key: true,
            exit_prompt: "Leave?".into(),
        });
        assert!(script.contains(r#""windowButtons":false"#));
        assert!(script.contains(r#""backKey":true"#));
        assert!(script.contains(r#""exitPrompt":"Leave?""#));
        assert!(!script.contains("{OPTIONS}"));
    }
}
