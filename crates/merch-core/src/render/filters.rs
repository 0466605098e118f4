//! Filter bar.

use crate::filter::{ActiveFilter, FilterButton};

use super::{html_escape, LinkStyle};

/// Render one link per filter button; the active one carries `active`.
#[must_use]
pub fn render_filter_bar(buttons: &[FilterButton], links: &LinkStyle) -> String {
    let buttons_html: String = buttons
        .iter()
        .map(|b| {
            let class = if b.active {
                "filter-btn active"
            } else {
                "filter-btn"
            };
            format!(
                r#"<a class="{class}" data-filter="{id}" href="{href}">
            <span>{label}</span>
            <div class="btn-bg"></div>
        </a>"#,
                id = html_escape(b.id),
                href = html_escape(&links.filter_href(&ActiveFilter::from_id(b.id))),
                label = html_escape(b.label),
            )
        })
        .collect();

    format!(r#"<div class="filter-buttons" id="filterButtons">{buttons_html}</div>"#)
}
