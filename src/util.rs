use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::prelude::Style;
use ratatui::style::Stylize;
use std::mem;

pub(crate) fn revert_style(mut style: Style) -> Style {
    if style.fg.is_some() && style.bg.is_some() {
        mem::swap(&mut style.fg, &mut style.bg);
        style
    } else {
        style.black().on_white()
    }
}

/// Move a page buffer into the view.
/// All cells in the page buffer are reset to defaults.
///
/// * page: Page buffer, positioned at 0,0.
/// * x_pos: Column of the left page border relative to the view.
///   Can be negative or beyond the view, the page is clipped.
/// * view_area: Target area.
/// * buf: Target buffer
pub(crate) fn transfer_page(page: &mut Buffer, x_pos: i32, view_area: Rect, buf: &mut Buffer) {
    if page.area.width == 0 {
        return;
    }
    for (cell_offset, cell) in page.content.iter_mut().enumerate() {
        let page_row = (cell_offset / page.area.width as usize) as u16;
        let page_col = (cell_offset % page.area.width as usize) as i32;

        let cell = mem::take(cell);

        let view_col = x_pos + page_col;
        if view_col < 0 || view_col >= view_area.width as i32 || page_row >= view_area.height {
            continue;
        }
        let buf_col = view_area.x + view_col as u16;
        let buf_row = view_area.y + page_row;
        if let Some(buf_cell) = buf.cell_mut((buf_col, buf_row)) {
            *buf_cell = cell;
        }
    }
}
