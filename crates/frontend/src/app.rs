//! Page boot: every behaviour is attached to the server-rendered document.

use crate::dashboards::d400_sales_analytics;
use crate::layout::{accessibility, left::sidebar, row_navigation, shortcuts};
use crate::shared::behaviors::{attach_behaviors, observe_body};
use crate::shared::modal::delete_dialog;
use crate::shared::{config, dom, theme};

pub fn boot() {
    let cfg = config::config();
    log::debug!("Client config: {:?}", cfg);

    theme::init();
    sidebar::init();
    shortcuts::init();
    delete_dialog::init();
    row_navigation::init();
    accessibility::init();

    if let Some(body) = dom::body() {
        attach_behaviors(&body);
    }
    if let Err(e) = observe_body() {
        log::error!("{}", e);
    }

    d400_sales_analytics::ui::init();
    log::info!("Pharmacy client ready");
}
