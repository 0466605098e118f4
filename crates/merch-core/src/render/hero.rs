use crate::filter::HeroStats;

/// Render the hero block with its three counters.
#[must_use]
pub fn render_hero(stats: &HeroStats) -> String {
    format!(
        r#"<section class="hero" id="home">
        <div class="hero-content">
            <h1 class="hero-title">BALLIN MERCH</h1>
            <div class="hero-stats">
                <div class="stat"><span class="stat-number" data-target="{products}">{products}</span><span class="stat-label">товаров</span></div>
                <div class="stat"><span class="stat-number" data-target="{categories}">{categories}</span><span class="stat-label">категорий</span></div>
                <div class="stat"><span class="stat-number" data-target="{third}">{third}</span><span class="stat-label">% качества</span></div>
            </div>
        </div>
    </section>"#,
        products = stats.total_products,
        categories = stats.total_categories,
        third = stats.third,
    )
}
