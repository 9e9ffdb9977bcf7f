//! DOM rewrite passes
//!
//! Each pass walks the `<body>` subtree once and mutates it in place. [`walk`] runs them in
//! the order the rehosted output depends on: images before logo SVGs (so replacement images
//! are not localized twice), links after styles, brand text and color attributes last.

use markup5ever_rcdom::{Handle, RcDom};

use crate::archive::SiteKey;
use crate::parsers::assets::AssetLocalizer;
use crate::parsers::css::rewrite_style;
use crate::parsers::link_rewriter::{rewrite_links_in_dom, LinkLocalizer};
use crate::registry::{
    apply_theme_colors, is_logo_asset, looks_like_logo_text, BrandRules, COLOR_ATTRIBUTES,
};

use super::dom::{
    ancestors, create_html_element, find_elements, find_elements_with_attr, get_node_attr,
    get_node_name, map_child_text, map_descendant_text, replace_node, set_node_attr,
    walk_elements,
};
use super::parser::rewrite_srcset;

/// Lazy-loading attributes that may carry the real image URL, in priority order
pub const LAZY_SRC_ATTRS: &[&str] = &[
    "data-src",
    "data-original",
    "data-lazy",
    "data-image",
    "data-bg",
    "data-background",
];

/// Attributes whose text goes through the brand rules
pub const BRAND_TEXT_ATTRS: &[&str] = &["title", "alt", "aria-label", "placeholder", "content"];

/// Everything a pass needs to know about the page being rewritten
#[derive(Clone, Copy)]
pub struct RewriteContext<'a> {
    pub assets: &'a AssetLocalizer,
    pub links: &'a LinkLocalizer,
    pub brand: &'a BrandRules,
    pub site_name: &'a str,
    pub page_dir: &'a str,
    pub site_key: SiteKey,
}

impl RewriteContext<'_> {
    fn localize(&self, raw_url: &str) -> String {
        self.assets.localize(raw_url, self.page_dir, self.site_key)
    }

    fn logo(&self) -> String {
        self.assets.forced_logo().into_url()
    }
}

/// Runs every rewrite pass over `body`
pub fn walk(dom: &RcDom, body: &Handle, ctx: &RewriteContext) {
    rewrite_images(body, ctx);
    replace_logo_svgs(dom, body, ctx);
    rewrite_sources(body, ctx);
    rewrite_styles(body, ctx);
    rewrite_links_in_dom(body, ctx.links, ctx.brand, ctx.page_dir);
    rewrite_brand_text(body, ctx.brand);
    rewrite_color_attributes(body);
}

fn non_empty_attr(node: &Handle, attr_name: &str) -> Option<String> {
    get_node_attr(node, attr_name).filter(|value| !value.is_empty())
}

/// Whether some ancestor's class or id marks it as a logo container
pub fn has_logo_ancestor(node: &Handle) -> bool {
    ancestors(node).iter().any(|ancestor| {
        looks_like_logo_text(get_node_attr(ancestor, "class").as_deref())
            || looks_like_logo_text(get_node_attr(ancestor, "id").as_deref())
    })
}

/// Promotes lazy-load URLs, localizes `src`/`srcset` and applies the logo override
pub fn rewrite_images(body: &Handle, ctx: &RewriteContext) {
    for img in find_elements(body, "img", true) {
        rewrite_image(&img, ctx);
    }
}

fn rewrite_image(img: &Handle, ctx: &RewriteContext) {
    let lazy_src = LAZY_SRC_ATTRS
        .iter()
        .find_map(|attr_name| non_empty_attr(img, attr_name));
    let src = get_node_attr(img, "src").unwrap_or_default();
    if let Some(lazy_src) = lazy_src {
        if src.is_empty() || src.ends_with(".html") {
            set_node_attr(img, "src", Some(lazy_src));
        }
    }
    for attr_name in LAZY_SRC_ATTRS {
        set_node_attr(img, attr_name, None);
    }

    if let Some(srcset) = non_empty_attr(img, "srcset").or_else(|| non_empty_attr(img, "data-srcset")) {
        let rewritten = rewrite_srcset(&srcset, &mut |url| ctx.localize(url));
        set_node_attr(img, "srcset", Some(rewritten));
    }
    set_node_attr(img, "data-srcset", None);

    if let Some(next_src) = non_empty_attr(img, "src") {
        let localized = if next_src.ends_with(".html") {
            ctx.logo()
        } else {
            ctx.localize(&next_src)
        };
        set_node_attr(img, "src", Some(localized));
    }

    let is_logo = is_logo_asset(
        get_node_attr(img, "src").as_deref(),
        get_node_attr(img, "alt").as_deref(),
        get_node_attr(img, "title").as_deref(),
        get_node_attr(img, "class").as_deref(),
    );
    if is_logo || has_logo_ancestor(img) {
        set_node_attr(img, "src", Some(ctx.logo()));
    }

    if non_empty_attr(img, "loading").is_none() {
        set_node_attr(img, "loading", Some("lazy".to_string()));
    }
    set_node_attr(img, "decoding", Some("async".to_string()));
    if non_empty_attr(img, "onerror").is_none() {
        let fallback = format!("this.onerror=null;this.src='{}';", ctx.logo());
        set_node_attr(img, "onerror", Some(fallback));
    }
}

/// Swaps logo-looking inline SVGs for an `<img>` of the canonical logo
pub fn replace_logo_svgs(dom: &RcDom, body: &Handle, ctx: &RewriteContext) {
    for svg in find_elements(body, "svg", true) {
        let looks_like_logo = ["class", "id", "aria-label", "title"]
            .iter()
            .any(|attr_name| looks_like_logo_text(get_node_attr(&svg, attr_name).as_deref()));
        if !looks_like_logo && !has_logo_ancestor(&svg) {
            continue;
        }

        let logo = ctx.logo();
        let img = create_html_element(
            dom,
            "img",
            &[
                ("src", logo.as_str()),
                ("alt", ctx.site_name),
                ("loading", "lazy"),
                ("decoding", "async"),
            ],
        );
        replace_node(dom, &svg, img);
    }
}

/// Localizes `<source srcset>` candidates, keeping their descriptors
pub fn rewrite_sources(body: &Handle, ctx: &RewriteContext) {
    for source in find_elements(body, "source", true) {
        if let Some(srcset) = non_empty_attr(&source, "srcset") {
            let rewritten = rewrite_srcset(&srcset, &mut |url| ctx.localize(url));
            set_node_attr(&source, "srcset", Some(rewritten));
        }
    }
}

/// Rewrites `style` attributes and `<style>` blocks
pub fn rewrite_styles(body: &Handle, ctx: &RewriteContext) {
    for node in find_elements_with_attr(body, "style") {
        if let Some(style) = non_empty_attr(&node, "style") {
            let rewritten = rewrite_style(&style, ctx.page_dir, ctx.site_key, ctx.assets);
            set_node_attr(&node, "style", Some(rewritten));
        }
    }

    for style in find_elements(body, "style", true) {
        map_child_text(&style, &mut |css| {
            rewrite_style(css, ctx.page_dir, ctx.site_key, ctx.assets)
        });
    }
}

/// Brand substitution over text nodes and [`BRAND_TEXT_ATTRS`]
pub fn rewrite_brand_text(root: &Handle, brand: &BrandRules) {
    map_descendant_text(root, &mut |text| brand.replace_site_name(text));

    walk_elements(root, &mut |node| {
        for attr_name in BRAND_TEXT_ATTRS {
            if let Some(value) = non_empty_attr(node, attr_name) {
                set_node_attr(node, attr_name, Some(brand.replace_site_name(&value)));
            }
        }
    });
}

/// Palette remap of `fill`, `stroke` and `stop-color` on `root` and every descendant
pub fn rewrite_color_attributes(root: &Handle) {
    recolor_element(root);
    walk_elements(root, &mut |node| recolor_element(node));
}

fn recolor_element(node: &Handle) {
    if get_node_name(node).is_none() {
        return;
    }
    for attr_name in COLOR_ATTRIBUTES {
        if let Some(value) = get_node_attr(node, attr_name).filter(|value| value.contains('#')) {
            set_node_attr(node, attr_name, Some(apply_theme_colors(&value)));
        }
    }
}
