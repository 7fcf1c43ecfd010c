/// 以 tab 分隔的文字做欄位對齊（elastic tabstops）。
///
/// 每一行以 `\t` 切成多個 cell，最後一個 cell 不參與對齊。連續多行在同一欄都有
/// cell 時構成一個欄位區塊，區塊內該欄寬度為「最寬 cell + padding」。
/// 只有一個 cell 的行（例如分隔線）會結束所有區塊。
///
/// 填充字元為 `\t` 時，欄寬先進位到 `tab_width` 的倍數，再以 tab 補齊；
/// 其他字元則逐格補滿。
#[derive(Debug, Clone, Copy)]
pub struct ColumnWriter {
    min_width: usize,
    tab_width: usize,
    padding: usize,
    pad_char: char,
}

impl Default for ColumnWriter {
    fn default() -> Self {
        Self::new(1, 8, 1, '\t')
    }
}

impl ColumnWriter {
    pub fn new(min_width: usize, tab_width: usize, padding: usize, pad_char: char) -> Self {
        Self {
            min_width,
            tab_width,
            padding,
            pad_char,
        }
    }

    pub fn align(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let lines: Vec<Vec<&str>> = text
            .split_terminator('\n')
            .map(|line| line.split('\t').collect())
            .collect();

        let mut out = String::with_capacity(text.len() * 2);
        let mut widths = Vec::new();
        self.format(&lines, &mut widths, 0, lines.len(), &mut out);

        if !text.ends_with('\n') {
            out.pop();
        }
        out
    }

    fn format(
        &self,
        lines: &[Vec<&str>],
        widths: &mut Vec<usize>,
        mut line0: usize,
        line1: usize,
        out: &mut String,
    ) {
        let column = widths.len();
        let mut this = line0;

        while this < line1 {
            if column + 1 >= lines[this].len() {
                this += 1;
                continue;
            }

            // 區塊開始前的行用目前的欄寬輸出
            self.write_lines(lines, widths, line0, this, out);
            line0 = this;

            let mut width = self.min_width;
            while this < line1 && column + 1 < lines[this].len() {
                width = width.max(cell_width(lines[this][column]) + self.padding);
                this += 1;
            }

            widths.push(width);
            self.format(lines, widths, line0, this, out);
            widths.pop();
            line0 = this;
        }

        self.write_lines(lines, widths, line0, line1, out);
    }

    fn write_lines(
        &self,
        lines: &[Vec<&str>],
        widths: &[usize],
        from: usize,
        to: usize,
        out: &mut String,
    ) {
        for line in &lines[from..to] {
            for (j, cell) in line.iter().enumerate() {
                out.push_str(cell);
                if j < widths.len() {
                    self.write_padding(cell_width(cell), widths[j], out);
                }
            }
            out.push('\n');
        }
    }

    fn write_padding(&self, text_width: usize, cell_width: usize, out: &mut String) {
        if self.pad_char == '\t' {
            if self.tab_width == 0 {
                return;
            }
            let cell_width = cell_width.div_ceil(self.tab_width) * self.tab_width;
            let tabs = cell_width.saturating_sub(text_width).div_ceil(self.tab_width);
            out.extend(std::iter::repeat('\t').take(tabs));
            return;
        }

        let pad = cell_width.saturating_sub(text_width);
        out.extend(std::iter::repeat(self.pad_char).take(pad));
    }
}

fn cell_width(cell: &str) -> usize {
    cell.chars().count()
}
