use crate::hook::Hook;
use crate::layer::HookLayer;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Конфигурация глобального subscriber'а.
///
/// **Поля**
/// - `enable_stdout`: если `true`, поверх [`HookLayer`] добавляется
///   `tracing_subscriber::fmt::Layer` и события дополнительно печатаются
///   в консоль.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self { enable_stdout: true }
    }
}

/// Install a global `tracing` subscriber that fires `hook` for every
/// event at one of its levels.
///
/// **Parameters**
/// - `hook`: the [`Hook`] receiving entries, usually a
///   [`Hooker`](crate::hooker::Hooker).
/// - `config`: [`LayerConfig`] controlling the extra stdout layer.
///
/// **Returns**
/// - `Err(..)` if a global subscriber has already been set.
pub fn init_tracing_with_config<H>(hook: H, config: LayerConfig) -> Result<(), SetGlobalDefaultError>
where
    H: Hook + 'static,
{
    let layer = HookLayer::new(hook);

    // Два варианта subscriber'а: типы с `fmt`‑слоем и без него различаются.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Initialize tracing with [`LayerConfig::default`].
pub fn init_tracing<H>(hook: H) -> Result<(), SetGlobalDefaultError>
where
    H: Hook + 'static,
{
    init_tracing_with_config(hook, LayerConfig::default())
}
