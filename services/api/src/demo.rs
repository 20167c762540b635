use crate::infra::{build_engine, build_gateway, parse_product_list, parse_tier_basis, ProductList};
use bundle_configurator::config::AppConfig;
use bundle_configurator::error::AppError;
use bundle_configurator::workflows::bundle::{
    ConfiguratorFlow, EligibilityView, FlowError, FulfillmentGateway, MockGateway, PricingEngine,
    ProductId, SubmissionOutcome, TierBasis, MOCK_VERIFICATION_CODE,
};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// CSV catalog to list instead of the configured one
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Comma-separated product ids, in selection order (e.g. 2,5,9)
    #[arg(long, value_parser = parse_product_list)]
    pub(crate) products: ProductList,
    /// CSV catalog to price against instead of the configured one
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Discount tier basis: count or amount
    #[arg(long, value_parser = parse_tier_basis)]
    pub(crate) basis: Option<TierBasis>,
    /// Print the pricing view as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Customer e-mail for the verification step
    #[arg(long, default_value = "demo@example.com")]
    pub(crate) email: String,
    /// Customer name for the verification step
    #[arg(long, default_value = "Demo Customer")]
    pub(crate) name: String,
    /// Products to toggle, in order
    #[arg(long, value_parser = parse_product_list, default_value = "2,5,9")]
    pub(crate) products: ProductList,
    /// Verification code to submit (defaults to the mock gateway's code)
    #[arg(long)]
    pub(crate) code: Option<String>,
    /// Use the configured gateway instead of the offline mock
    #[arg(long)]
    pub(crate) live: bool,
}

fn load_config(csv: Option<PathBuf>, basis: Option<TierBasis>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if csv.is_some() {
        config.catalog.csv_path = csv;
    }
    if let Some(basis) = basis {
        config.catalog.tier_basis = basis;
    }
    Ok(config)
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let config = load_config(args.csv, None)?;
    let engine = build_engine(&config)?;
    render_catalog(&engine);
    Ok(())
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        products,
        csv,
        basis,
        json,
    } = args;

    let config = load_config(csv, basis)?;
    let engine = build_engine(&config)?;
    let selection = engine.selection_from_ids(products.0)?;
    let view = engine.quote(&selection);

    if json {
        match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Pricing view unavailable: {}", err),
        }
    } else {
        render_quote(&engine, selection.ids(), &view);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        email,
        name,
        products,
        code,
        live,
    } = args;

    let config = AppConfig::load()?;
    let engine = Arc::new(build_engine(&config)?);
    let gateway: Arc<dyn FulfillmentGateway> = if live {
        build_gateway(&config.gateway)
    } else {
        Arc::new(MockGateway::new())
    };

    println!("Bundle checkout demo");
    let mut flow = ConfiguratorFlow::new(engine.clone(), gateway);
    render_step(&flow);

    let dispatch = flow.submit_contact(&email, &name)?;
    dispatch.join().await.map_err(FlowError::from)?;
    println!("  Verification code requested for {} <{}>", name, email);
    render_step(&flow);

    let code = code.unwrap_or_else(|| MOCK_VERIFICATION_CODE.to_string());
    flow.verify_code(&code).await?;
    println!("  Code {} accepted", code);
    render_step(&flow);

    for id in products.0 {
        match flow.toggle_product(id) {
            Ok(view) => println!(
                "  Toggled product {} -> {} selected, {} total",
                id,
                view.total_products,
                money(view.final_amount)
            ),
            Err(FlowError::Selection(err)) => println!("  Skipped product {}: {}", id, err),
            Err(other) => return Err(other.into()),
        }
    }

    let view = flow.quote();
    render_quote(&engine, flow.selection().ids(), &view);

    match flow.submit_bundle().await? {
        SubmissionOutcome::ExternalCheckout { payment_link } => {
            println!("\nSpecial bundle selected; continue at {}", payment_link);
        }
        SubmissionOutcome::Confirmed(confirmation) => {
            render_step(&flow);
            println!(
                "  Bundle {} recorded",
                confirmation.receipt.bundle_id.as_deref().unwrap_or("(unnamed)")
            );
            if let Some(message) = &confirmation.receipt.message {
                println!("  {}", message);
            }
            match confirmation.receipt.payment_target() {
                Some(target) => println!("  Pay at {}", target),
                None => println!("  Browse more at {}", config.gateway.store_url),
            }
        }
    }

    Ok(())
}

fn render_step(flow: &ConfiguratorFlow) {
    let progress = flow.progress();
    println!(
        "\nStep {} of {} ({}%): {}",
        progress.step,
        progress.total,
        progress.percent,
        flow.step().label()
    );
}

fn render_catalog(engine: &PricingEngine) {
    let rule = engine.exclusivity();
    let special = engine.special_offer();

    println!("Catalog ({} products)", engine.catalog().len());
    for product in engine.catalog().products() {
        let mut markers = Vec::new();
        if product.id == rule.primary {
            markers.push("primary");
        }
        if special.products.contains(&product.id) {
            markers.push("special bundle");
        }
        if rule.is_excluded(product.id) {
            markers.push("hidden with primary");
        }
        println!(
            "  {:>3}  {:<40} {:>9}  {:<10} {}",
            product.id.0,
            product.name,
            money(product.price),
            product.category.label(),
            markers.join(", ")
        );
    }

    println!(
        "\nSpecial bundle: {} for {} (save {})",
        special
            .products
            .iter()
            .map(ProductId::to_string)
            .collect::<Vec<_>>()
            .join(" + "),
        money(special.final_amount),
        money(special.discount_amount)
    );
    println!("Discount tiers ({:?})", engine.discount_table().basis());
    for tier in engine.discount_table().tiers() {
        let upper = tier
            .max
            .map(|max| max.to_string())
            .unwrap_or_else(|| "and up".to_string());
        println!("  {} - {}: {}%", tier.min, upper, tier.percentage);
    }
}

fn render_quote(engine: &PricingEngine, selected: &[ProductId], view: &EligibilityView) {
    println!("\nSelection ({} products)", view.total_products);
    for (index, id) in selected.iter().enumerate() {
        match engine.catalog().get(*id) {
            Some(product) => println!(
                "  {:>2}. {:<40} {:>9}",
                index + 1,
                product.name,
                money(product.price)
            ),
            None => println!("  {:>2}. unknown product {}", index + 1, id),
        }
    }

    println!("Subtotal: {}", money(view.subtotal));
    if view.is_special_bundle {
        println!("Special bundle saving: -{}", money(view.discount_amount));
    } else {
        println!(
            "Discount ({}%): -{}",
            view.discount_percentage,
            money(view.discount_amount)
        );
    }
    println!("Total: {}", money(view.final_amount));
    if let Some(link) = &view.payment_link {
        println!("Checkout: {}", link);
    }
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_always_shows_cents() {
        assert_eq!(money(Decimal::from(149)), "$149.00");
        assert_eq!(money(Decimal::new(765, 1)), "$76.50");
    }
}
