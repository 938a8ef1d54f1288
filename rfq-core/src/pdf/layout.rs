//! Flow layout: paragraphs, spacers and tables poured into A4 frames.
//!
//! The story is laid out top to bottom inside the page margins. Paragraphs
//! break between lines and tables between rows when a frame is full.

use super::metrics::{unmappable_chars, Font};

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

/// RGB colour with components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const GREY: Rgb = Rgb(0.5, 0.5, 0.5);

    pub const fn grey(level: f32) -> Rgb {
        Rgb(level, level, level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Middle,
    Bottom,
}

/// Page size and margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 portrait with equal margins.
    pub fn a4(margin_mm: f32) -> Self {
        Self {
            width: 210.0 * MM,
            height: 297.0 * MM,
            margin: margin_mm * MM,
        }
    }

    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn frame_top(&self) -> f32 {
        self.height - self.margin
    }

    fn frame_bottom(&self) -> f32 {
        self.margin
    }
}

/// Text style of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font_size: f32,
    pub leading: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub color: Rgb,
    pub font: Font,
}

impl ParagraphStyle {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            leading: font_size * 1.2,
            space_before: 0.0,
            space_after: 0.0,
            color: Rgb::BLACK,
            font: Font::Helvetica,
        }
    }

    pub fn spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self) -> Self {
        self.font = Font::HelveticaBold;
        self
    }
}

/// A piece of text in one font. `\n` forces a line break.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    /// Overrides the paragraph font when set.
    pub font: Option<Font>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: Some(Font::HelveticaBold),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub style: ParagraphStyle,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: ParagraphStyle) -> Self {
        Self::rich(vec![Run::plain(text)], style)
    }

    pub fn rich(runs: Vec<Run>, style: ParagraphStyle) -> Self {
        Self { runs, style }
    }
}

/// Rectangular cell range in `(col, row)` form. Negative indices count from the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: (i32, i32),
    pub end: (i32, i32),
}

impl Region {
    pub const ALL: Region = Region::new((0, 0), (-1, -1));

    pub const fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        Self { start, end }
    }

    /// A whole row.
    pub const fn row(row: i32) -> Self {
        Self::new((0, row), (-1, row))
    }

    /// Whole columns `first..=last`.
    pub const fn cols(first: i32, last: i32) -> Self {
        Self::new((first, 0), (last, -1))
    }

    fn resolve(index: i32, len: usize) -> i32 {
        if index < 0 {
            len as i32 + index
        } else {
            index
        }
    }

    /// Resolved `(col range, row range)` for a table of the given shape.
    fn bounds(&self, cols: usize, rows: usize) -> ((i32, i32), (i32, i32)) {
        (
            (Self::resolve(self.start.0, cols), Self::resolve(self.end.0, cols)),
            (Self::resolve(self.start.1, rows), Self::resolve(self.end.1, rows)),
        )
    }

    fn contains(&self, col: usize, row: usize, cols: usize, rows: usize) -> bool {
        let ((c0, c1), (r0, r1)) = self.bounds(cols, rows);
        let (col, row) = (col as i32, row as i32);
        (c0..=c1).contains(&col) && (r0..=r1).contains(&row)
    }
}

/// One styling instruction, applied in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableCommand {
    FontSize(Region, f32),
    Font(Region, Font),
    TextColor(Region, Rgb),
    Align(Region, Align),
    VAlign(Region, VAlign),
    Background(Region, Rgb),
    TopPadding(Region, f32),
    /// Every cell edge in the region.
    Grid(Region, f32, Rgb),
    /// A rule above each row of the region.
    LineAbove(Region, f32, Rgb),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStyle {
    pub commands: Vec<TableCommand>,
}

impl TableStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, command: TableCommand) -> Self {
        self.commands.push(command);
        self
    }
}

/// A grid of text cells with fixed column widths. `\n` in a cell forces a line break.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
    pub col_widths: Vec<f32>,
    pub style: TableStyle,
}

impl Table {
    pub fn new<R, C>(rows: R, col_widths: &[f32]) -> Self
    where
        R: IntoIterator<Item = Vec<C>>,
        C: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            col_widths: col_widths.to_vec(),
            style: TableStyle::default(),
        }
    }

    pub fn style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }
}

/// An element of the story.
#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    Paragraph(Paragraph),
    /// Vertical gap in points.
    Spacer(f32),
    Table(Table),
}

/// A drawing primitive in page coordinates (origin bottom left).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Concatenated text of the page, one draw call per line.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            if let DrawOp::Text { text, .. } = op {
                out.push_str(text);
                out.push('\n');
            }
        }
        out
    }
}

/// A wrapped line: consecutive segments that may switch font.
#[derive(Debug, Clone, Default, PartialEq)]
struct Line {
    segments: Vec<(Font, String)>,
    width: f32,
}

impl Line {
    fn push(&mut self, font: Font, text: &str, size: f32) {
        self.width += font.text_width(text, size);
        if let Some((last, buf)) = self.segments.last_mut() {
            if *last == font {
                buf.push_str(text);
                return;
            }
        }
        self.segments.push((font, text.to_string()));
    }

    fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Greedy word wrap of `runs` into lines no wider than `max_width`.
///
/// A single word wider than the line is kept whole on its own line.
fn wrap(runs: &[Run], default_font: Font, size: f32, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();

    for run in runs {
        let font = run.font.unwrap_or(default_font);
        for (i, piece) in run.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(std::mem::take(&mut line));
            }
            for word in piece.split_whitespace() {
                if line.is_empty() {
                    line.push(font, word, size);
                    continue;
                }
                let candidate = font.text_width(" ", size) + font.text_width(word, size);
                if line.width + candidate <= max_width {
                    line.push(font, " ", size);
                    line.push(font, word, size);
                } else {
                    lines.push(std::mem::take(&mut line));
                    line.push(font, word, size);
                }
            }
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[derive(Debug, Clone, Copy)]
struct CellStyle {
    font: Font,
    size: f32,
    color: Rgb,
    align: Align,
    valign: VAlign,
    background: Option<Rgb>,
    top_padding: f32,
}

const CELL_PADDING_X: f32 = 6.0;
const CELL_PADDING_BOTTOM: f32 = 3.0;

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            font: Font::Helvetica,
            size: 10.0,
            color: Rgb::BLACK,
            align: Align::Left,
            valign: VAlign::Bottom,
            background: None,
            top_padding: 3.0,
        }
    }
}

impl CellStyle {
    fn leading(&self) -> f32 {
        self.size * 1.2
    }
}

/// Column and row layout of a table, ready to draw row by row.
struct TableLayout<'t> {
    table: &'t Table,
    styles: Vec<Vec<CellStyle>>,
    lines: Vec<Vec<Vec<Line>>>,
    heights: Vec<f32>,
}

impl<'t> TableLayout<'t> {
    fn new(table: &'t Table) -> Self {
        let rows = table.rows.len();
        let cols = table.col_widths.len();
        let mut styles = vec![vec![CellStyle::default(); cols]; rows];

        for command in &table.style.commands {
            for (r, row) in styles.iter_mut().enumerate() {
                for (c, cell) in row.iter_mut().enumerate() {
                    apply(command, cell, c, r, cols, rows);
                }
            }
        }

        let mut lines = Vec::with_capacity(rows);
        let mut heights = Vec::with_capacity(rows);
        for (r, row) in table.rows.iter().enumerate() {
            let mut row_lines = Vec::with_capacity(cols);
            let mut height: f32 = 0.0;
            for (c, width) in table.col_widths.iter().enumerate() {
                let style = styles[r][c];
                let text = row.get(c).map(String::as_str).unwrap_or("");
                let wrapped = wrap(
                    &[Run::plain(text)],
                    style.font,
                    style.size,
                    width - 2.0 * CELL_PADDING_X,
                );
                let content = wrapped.len().max(1) as f32 * style.leading();
                height = height.max(content + style.top_padding + CELL_PADDING_BOTTOM);
                row_lines.push(wrapped);
            }
            lines.push(row_lines);
            heights.push(height);
        }

        Self {
            table,
            styles,
            lines,
            heights,
        }
    }

    fn col_x(&self, x0: f32, col: usize) -> f32 {
        x0 + self.table.col_widths[..col].iter().sum::<f32>()
    }

    /// Draw row `r` with its top edge at `top`.
    fn draw_row(&self, page: &mut Page, r: usize, x0: f32, top: f32) {
        let cols = self.table.col_widths.len();
        let rows = self.table.rows.len();
        let height = self.heights[r];
        let bottom = top - height;

        for c in 0..cols {
            let style = self.styles[r][c];
            let x = self.col_x(x0, c);
            let width = self.table.col_widths[c];

            if let Some(fill) = style.background {
                page.ops.push(DrawOp::Rect {
                    x,
                    y: bottom,
                    width,
                    height,
                    fill,
                });
            }

            let lines = &self.lines[r][c];
            let block = lines.len() as f32 * style.leading();
            let block_top = match style.valign {
                VAlign::Bottom => bottom + CELL_PADDING_BOTTOM + block,
                VAlign::Middle => {
                    (top - style.top_padding + bottom + CELL_PADDING_BOTTOM) / 2.0 + block / 2.0
                }
            };
            for (i, line) in lines.iter().enumerate() {
                let line_x = match style.align {
                    Align::Left => x + CELL_PADDING_X,
                    Align::Right => x + width - CELL_PADDING_X - line.width,
                    Align::Center => x + (width - line.width) / 2.0,
                };
                let baseline = block_top - style.size - i as f32 * style.leading();
                draw_line(page, line, line_x, baseline, style.size, style.color);
            }
        }

        for command in &self.table.style.commands {
            match *command {
                TableCommand::Grid(region, width, color) => {
                    let ((c0, c1), (r0, r1)) = region.bounds(cols, rows);
                    if !(r0..=r1).contains(&(r as i32)) || c0 > c1 {
                        continue;
                    }
                    let left = self.col_x(x0, c0 as usize);
                    let right = self.col_x(x0, c1 as usize + 1);
                    for y in [top, bottom] {
                        page.ops.push(rule((left, y), (right, y), width, color));
                    }
                    for c in c0..=c1 + 1 {
                        let x = self.col_x(x0, c as usize);
                        page.ops.push(rule((x, top), (x, bottom), width, color));
                    }
                }
                TableCommand::LineAbove(region, width, color) => {
                    let ((c0, c1), (r0, r1)) = region.bounds(cols, rows);
                    if !(r0..=r1).contains(&(r as i32)) || c0 > c1 {
                        continue;
                    }
                    let left = self.col_x(x0, c0 as usize);
                    let right = self.col_x(x0, c1 as usize + 1);
                    page.ops.push(rule((left, top), (right, top), width, color));
                }
                _ => {}
            }
        }
    }
}

fn apply(
    command: &TableCommand,
    cell: &mut CellStyle,
    c: usize,
    r: usize,
    cols: usize,
    rows: usize,
) {
    let inside = |region: Region| region.contains(c, r, cols, rows);
    match *command {
        TableCommand::FontSize(region, size) if inside(region) => cell.size = size,
        TableCommand::Font(region, font) if inside(region) => cell.font = font,
        TableCommand::TextColor(region, color) if inside(region) => cell.color = color,
        TableCommand::Align(region, align) if inside(region) => cell.align = align,
        TableCommand::VAlign(region, valign) if inside(region) => cell.valign = valign,
        TableCommand::Background(region, fill) if inside(region) => {
            cell.background = Some(fill)
        }
        TableCommand::TopPadding(region, padding) if inside(region) => {
            cell.top_padding = padding
        }
        _ => {}
    }
}

fn rule(from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) -> DrawOp {
    DrawOp::Line {
        from,
        to,
        width,
        color,
    }
}

fn draw_line(page: &mut Page, line: &Line, x: f32, baseline: f32, size: f32, color: Rgb) {
    let mut x = x;
    for (font, text) in &line.segments {
        page.ops.push(DrawOp::Text {
            x,
            y: baseline,
            font: *font,
            size,
            color,
            text: text.clone(),
        });
        x += font.text_width(text, size);
    }
}

/// Cursor over the pages being filled.
struct Frame {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f32,
}

impl Frame {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            y: geometry.frame_top(),
        }
    }

    fn at_top(&self) -> bool {
        self.y >= self.geometry.frame_top()
    }

    fn fits(&self, height: f32) -> bool {
        self.y - height >= self.geometry.frame_bottom() - 0.01
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.geometry.frame_top();
    }

    /// Start a new page unless `height` fits or the page is still empty.
    fn reserve(&mut self, height: f32) {
        if !self.fits(height) && !self.at_top() {
            self.new_page();
        }
    }

    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

fn warn_unmappable<'s>(kind: &str, texts: impl IntoIterator<Item = &'s str>) {
    let lost: String = texts.into_iter().map(unmappable_chars).collect();
    if !lost.is_empty() {
        tracing::warn!(kind, chars = %lost, "Characters outside WinAnsi will print as '?'");
    }
}

/// Lay out `story` into pages.
pub fn paginate(story: &[Flowable], geometry: &PageGeometry) -> Vec<Page> {
    let mut frame = Frame::new(*geometry);
    let left = geometry.margin;

    for flowable in story {
        match flowable {
            Flowable::Spacer(height) => {
                if frame.fits(*height) {
                    frame.y -= height;
                } else {
                    frame.new_page();
                }
            }
            Flowable::Paragraph(paragraph) => {
                warn_unmappable("paragraph", paragraph.runs.iter().map(|r| r.text.as_str()));
                let style = paragraph.style;
                if !frame.at_top() {
                    frame.y -= style.space_before;
                }
                let lines = wrap(
                    &paragraph.runs,
                    style.font,
                    style.font_size,
                    geometry.frame_width(),
                );
                for line in &lines {
                    frame.reserve(style.leading);
                    let baseline = frame.y - style.font_size;
                    draw_line(frame.page(), line, left, baseline, style.font_size, style.color);
                    frame.y -= style.leading;
                }
                frame.y -= style.space_after;
            }
            Flowable::Table(table) => {
                warn_unmappable("table", table.rows.iter().flatten().map(String::as_str));
                let layout = TableLayout::new(table);
                let x0 = left + ((geometry.frame_width() - table.width()) / 2.0).max(0.0);
                for (r, height) in layout.heights.iter().enumerate() {
                    frame.reserve(*height);
                    let top = frame.y;
                    layout.draw_row(frame.page(), r, x0, top);
                    frame.y -= height;
                }
            }
        }
    }

    frame.pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.segments.iter().map(|(_, t)| t.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "We are happy to provide you the following non-binding offer \
                    subject to our general terms";
        let lines = wrap(&[Run::plain(text)], Font::Helvetica, 9.0, 150.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 150.0);
        }
        assert_eq!(words(&lines).join(" "), text);
    }

    #[test]
    fn test_wrap_hard_breaks_and_fonts() {
        let runs = vec![Run::bold("Company"), Run::plain("\nStreet 1\nTown")];
        let lines = wrap(&runs, Font::Helvetica, 9.0, 400.0);
        assert_eq!(words(&lines), vec!["Company", "Street 1", "Town"]);
        assert_eq!(lines[0].segments[0].0, Font::HelveticaBold);
        assert_eq!(lines[1].segments[0].0, Font::Helvetica);
    }

    #[test]
    fn test_long_word_is_not_split() {
        let lines = wrap(&[Run::plain("DE68100400000573643400")], Font::Helvetica, 9.0, 20.0);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_region_negative_indices() {
        let region = Region::new((5, 1), (6, -1));
        assert!(region.contains(6, 3, 7, 4));
        assert!(!region.contains(4, 3, 7, 4));
        assert!(!region.contains(5, 0, 7, 4));
        assert!(Region::row(-1).contains(0, 3, 7, 4));
    }

    #[test]
    fn test_long_story_paginates() {
        let geometry = PageGeometry::a4(20.0);
        let style = ParagraphStyle::new(9.0).spacing(4.0, 4.0);
        let story: Vec<Flowable> = (0..200)
            .map(|i| Flowable::Paragraph(Paragraph::new(format!("Line {}", i), style)))
            .collect();
        let pages = paginate(&story, &geometry);
        assert!(pages.len() > 1);
        for page in &pages {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    assert!(*y >= geometry.margin - 9.0);
                }
            }
        }
        assert!(pages[1].text().starts_with("Line "));
    }

    #[test]
    fn test_table_is_centered_with_styles() {
        let geometry = PageGeometry::a4(20.0);
        let table = Table::new(vec![vec!["Item", "Value"], vec!["1", "2,206.40"]], &[100.0, 100.0])
            .style(
                TableStyle::new()
                    .with(TableCommand::Background(Region::row(0), Rgb::grey(0.9)))
                    .with(TableCommand::Align(Region::cols(1, 1), Align::Right)),
            );
        let pages = paginate(&[Flowable::Table(table)], &geometry);
        assert_eq!(pages.len(), 1);

        let rects: Vec<_> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        let expected_left = geometry.margin + (geometry.frame_width() - 200.0) / 2.0;
        assert_eq!(rects.len(), 2);
        assert!((rects[0] - expected_left).abs() < 1e-3);

        let value_x = pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, text, .. } if text == "2,206.40" => Some(*x),
                _ => None,
            })
            .unwrap();
        let right_edge = expected_left + 200.0 - CELL_PADDING_X;
        let width = Font::Helvetica.text_width("2,206.40", 10.0);
        assert!((value_x + width - right_edge).abs() < 1e-3);
    }
}
