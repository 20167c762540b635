use rust_decimal::Decimal;

use super::{Product, ProductCategory, ProductId};

/// Automation webhook that records verifications and bundles.
pub const WEBHOOK_URL: &str = "https://hook.us2.make.com/vfar8onjq8w3fgv18s9yonqeh6y67m5h";

/// Pre-provisioned checkout for the special bundle.
pub const SPECIAL_BUNDLE_CHECKOUT_URL: &str =
    "https://buy.stripe.com/28og2K5041VP7pC14s?prefilled_promo_code=ALN1";

/// Storefront shown once a bundle is confirmed.
pub const STORE_URL: &str = "https://cleverpoly.store/products";

/// The Lazy-Motion Library.
pub const PRIMARY_PRODUCT: ProductId = ProductId(1);

/// Everything except the primary product and the two special-bundle companions.
pub fn disabled_when_primary_selected() -> Vec<ProductId> {
    (4..=36).map(ProductId).collect()
}

pub fn special_bundle_products() -> Vec<ProductId> {
    vec![ProductId(1), ProductId(2), ProductId(3)]
}

pub(crate) fn products() -> Vec<Product> {
    use ProductCategory::*;

    [
        (1, "The Lazy-Motion Library", "price_1RP7SmFXBh2FfiM2D3wRPXaj", 99, Premium),
        (2, "Advanced 3d Product Animation Course", "price_1PmGfEFXBh2FfiM23zNpC9pp", 40, Course),
        (3, "Textify: Callouts & Titles", "price_1PmGneFXBh2FfiM2n4WQUuj4", 25, Tools),
        (4, "H2O droplet Simulation", "price_1PfilwFXBh2FfiM2Ce9p1FqB", 20, Effects),
        (5, "Pack of 5 Handmade motions", "price_1QWM21FXBh2FfiM21X0aVwgO", 15, Animations),
        (6, "Animated Arrays", "price_1QWLveFXBh2FfiM2hXqvkHx3", 10, Animations),
        (7, "Cloth Printing", "price_1QWLoBFXBh2FfiM2Jw1gEtIV", 10, Effects),
        (8, "Ice Off", "price_1RMDOsFXBh2FfiM2umglwjbB", 9, Effects),
        (9, "Cloth On Path", "price_1RMD3cFXBh2FfiM2Kddmsols", 8, Effects),
        (10, "Easy Grid", "price_1QWQliFXBh2FfiM2LexToGlc", 8, Tools),
        (11, "Motion Path", "price_1QWLrBFXBh2FfiM2XdHzF469", 8, Animations),
        (12, "Knitting", "price_1RMCpbFXBh2FfiM2q0d5pbb2", 8, Effects),
        (13, "Unfold", "price_1RMDH3FXBh2FfiM2OSyGZ6UD", 7, Effects),
        (14, "The Sprayer", "price_1RMD7xFXBh2FfiM2vgiPHmdb", 7, Effects),
        (15, "Water-bender", "price_1Q8P40FXBh2FfiM2EdzLBP6k", 7, Effects),
        (16, "MeshGen", "price_1RMDDoFXBh2FfiM2QiIH4gcd", 6, Tools),
        (17, "Soft Balls", "price_1QWM0ZFXBh2FfiM2LUfq2M1v", 6, Effects),
        (18, "Shift Line A & B", "price_1RMDHnFXBh2FfiM2Wjp32JAV", 5, Effects),
        (19, "Projector", "price_1RMDFzFXBh2FfiM2Y9UfauFQ", 5, Effects),
        (20, "Slideshow A", "price_1RMD8rFXBh2FfiM27hhFvwjl", 5, Effects),
        (21, "Bubbles on Path", "price_1QWLzdFXBh2FfiM2WyBPFmZC", 5, Effects),
        (22, "Things on Path", "price_1Q8P5BFXBh2FfiM2bgbmL9Ul", 5, Effects),
        (23, "The Tornado", "price_1RMDfxFXBh2FfiM2A2TLeZI2", 5, Effects),
        (24, "360 Loop", "price_1Q8PJYFXBh2FfiM2ywcoxwVw", 4, Animations),
        (25, "Auto Animate", "price_1Q8PItFXBh2FfiM2L3EinmLP", 4, Animations),
        (26, "Swirls", "price_1RMD73FXBh2FfiM2FvTIh3si", 4, Effects),
        (27, "Good Shapekeys", "price_1QWLxdFXBh2FfiM2jJiY0sEe", 4, Tools),
        (28, "Roll on Path", "price_1QWM3pFXBh2FfiM27PT0ZhgT", 4, Effects),
        (29, "Motion Domain", "price_1RMCuMFXBh2FfiM2afaW3bXj", 4, Animations),
        (30, "Ripples", "price_1RMD05FXBh2FfiM2ZCNNGiHq", 4, Effects),
        (31, "Slideshow B", "price_1RMD9XFXBh2FfiM2gYkPOpTZ", 4, Effects),
        (32, "Sprikles", "price_1RMDf7FXBh2FfiM2ofCMBn4d", 4, Effects),
        (33, "Levitate", "price_1RMD1DFXBh2FfiM2uR1E2Avh", 3, Effects),
        (34, "Gear Platform", "price_1RMD2ZFXBh2FfiM2BgdWYm6Q", 3, Effects),
        (35, "Wheel", "price_1RMDPsFXBh2FfiM2ezrEdtWP", 3, Effects),
        (36, "Pop up Pro", "price_1RMDFDFXBh2FfiM27vhVQqLT", 3, Effects),
    ]
    .into_iter()
    .map(|(id, name, price_id, price, category)| Product {
        id: ProductId(id),
        name: name.to_string(),
        price_id: price_id.to_string(),
        price: Decimal::from(price),
        category,
    })
    .collect()
}
