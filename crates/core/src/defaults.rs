//! Built-in catalog content.
//!
//! Shown on first run, before either the remote document or the local cache
//! has produced anything.

use crate::types::{AppData, CaseStudy, CaseStudyId, Product, ProductCategory, ProductId};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// The default product line-up.
#[must_use]
pub fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("type-c"),
            model: "VER-LITE".to_string(),
            name: "Type C: Lite Edition (entry level)".to_string(),
            category: ProductCategory::Software,
            sub_category: "3D Digital Showroom".to_string(),
            price: "¥10,000 (initial build)".to_string(),
            description: "A concept space for early-stage companies with basic AI \
                          interaction and a 24/7 AI receptionist. Adapts to desktop, \
                          mobile and casting, and goes live fast."
                .to_string(),
            features: lines(&[
                "Concept space + basic AI interaction",
                "24/7 AI receptionist",
                "Fast launch, high value",
                "Multi-device (desktop/mobile/casting)",
            ]),
            specs: lines(&[
                "Content: 2 videos + 2 narrations + 1 knowledge base",
                "Use case: start-ups, quick showcases",
                "Operations: 3 months basic operations (5 concurrent)",
                "Renewal: ¥2,000/quarter or ¥5,000/year",
            ]),
            image_url: "https://images.unsplash.com/photo-1497215728101-856f4ea42174?w=800&auto=format&fit=crop&q=60".to_string(),
            brochure_url: None,
        },
        Product {
            id: ProductId::new("type-b"),
            model: "VER-STD-PRO".to_string(),
            name: "Type B: Standard Pro Edition (best seller)".to_string(),
            category: ProductCategory::Software,
            sub_category: "3D Digital Showroom".to_string(),
            price: "¥30,000 - ¥50,000".to_string(),
            description: "For growing companies: a 3D voice-guided showroom with deep \
                          walkthroughs, cloud rendering on every platform, and an \
                          optional custom full-body digital presenter."
                .to_string(),
            features: lines(&[
                "3D voice-guided showroom + deep walkthrough",
                "Optional custom digital presenter",
                "Cloud rendering (PC/mobile/tablet)",
                "Fast deployment",
            ]),
            specs: lines(&[
                "Content: 5 booth narrations + 2 videos + 2 images + 1 model",
                "Pricing: ¥30k (no presenter) / ¥50k (with presenter)",
                "Operations: 3 months basic operations (5 concurrent)",
                "Renewal (with presenter): ¥20k/quarter or ¥60k/year",
            ]),
            image_url: "https://images.unsplash.com/photo-1557804506-669a67965ba0?w=800&auto=format&fit=crop&q=60".to_string(),
            brochure_url: None,
        },
        Product {
            id: ProductId::new("type-a"),
            model: "VER-FLAGSHIP".to_string(),
            name: "Type A: Flagship Custom Edition (premium)".to_string(),
            category: ProductCategory::Software,
            sub_category: "3D Digital Showroom".to_string(),
            price: "¥100,000".to_string(),
            description: "Fully bespoke design and development for leading companies and \
                          government exhibition halls, with on-premises deployment and \
                          large-screen adaptation."
                .to_string(),
            features: lines(&[
                "Fully bespoke design and development",
                "On-premises deployment + large-screen adaptation",
                "Custom full-body digital presenter",
                "White-glove service",
            ]),
            specs: lines(&[
                "Content: fully custom",
                "Use case: industry leaders, government halls",
                "Operations: 3 months basic operations (5 concurrent)",
                "Renewal: ¥20,000/quarter or ¥60,000/year",
            ]),
            image_url: "https://images.unsplash.com/photo-1486406146926-c627a92ad1ab?w=800&auto=format&fit=crop&q=60".to_string(),
            brochure_url: None,
        },
    ]
}

/// The default case studies.
#[must_use]
pub fn default_cases() -> Vec<CaseStudy> {
    vec![
        CaseStudy {
            id: CaseStudyId::new("c1"),
            title: "Provincial smart-city exhibition hall (Type A)".to_string(),
            description: "A flagship deployment on local large screens with a custom \
                          government digital presenter, cutting guided-tour staffing costs."
                .to_string(),
            image_url: "https://images.unsplash.com/photo-1556761175-5973dc0f32e7?w=800&auto=format&fit=crop&q=60".to_string(),
            link_url: Some("#".to_string()),
        },
        CaseStudy {
            id: CaseStudyId::new("c2"),
            title: "Tech unicorn website 3D showroom (Type B)".to_string(),
            description: "A Standard Pro showroom with a branded digital presenter, giving \
                          investors and customers an immersive product walkthrough."
                .to_string(),
            image_url: "https://images.unsplash.com/photo-1504384308090-c54be3853247?w=800&auto=format&fit=crop&q=60".to_string(),
            link_url: Some("#".to_string()),
        },
    ]
}

/// The default document, unstamped.
#[must_use]
pub fn default_catalog() -> AppData {
    AppData::new(default_products(), default_cases(), 0)
}
