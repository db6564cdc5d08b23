use handlebars::Handlebars;
use std::sync::Arc;

pub type Hbs = Arc<Handlebars<'static>>;

// Compiled in so the binary and the tests don't depend on the working directory.
const BASE: &str = include_str!("../templates/layouts/base.hbs");
const DASHBOARD: &str = include_str!("../templates/pages/dashboard.hbs");
const DASHBOARD_ERROR: &str = include_str!("../templates/partials/dashboard_error.hbs");
const KPI_CARDS: &str = include_str!("../templates/partials/kpi_cards.hbs");

pub fn build_handlebars() -> Hbs {
    let mut hb = Handlebars::new();
    hb.set_strict_mode(false);

    // Layout + pages
    hb.register_template_string("layouts/base", BASE)
        .expect("template layouts/base");
    hb.register_template_string("pages/dashboard", DASHBOARD)
        .expect("template pages/dashboard");

    // Partial endpoints
    hb.register_template_string("partials/dashboard_error", DASHBOARD_ERROR)
        .expect("template partials/dashboard_error");

    hb.register_partial("kpi_cards", KPI_CARDS)
        .expect("register kpi_cards partial");

    Arc::new(hb)
}
