//! LaTeX table fragments for thesis-style result tables.

use crate::stats::Summary;

pub const HEADER: &str = r"\begin{table}[h]
\begin{center}
\begin{tabular}{|l|r|r|r|r|}
\hline
Benchmark & Min & Max & Mean & StdDev \\
\hline
\hline";

pub const FOOTER: &str = r"\hline
\end{tabular}
\caption{Werte in $\mu s$}
%\label{tab:ni_1}
\end{center}
\end{table}";

/// One table row, values in microseconds with three decimals.
///
/// With `decimal_comma` the numbers (not the label) use `,` as decimal
/// separator.
pub fn row(label: &str, summary: &Summary, decimal_comma: bool) -> String {
    let num = |ns: f64| {
        let s = format!("{:.3}", ns / 1000.0);
        if decimal_comma { s.replace('.', ",") } else { s }
    };

    format!(
        "{} & {} & {} & {} & {} \\\\",
        label,
        num(summary.min as f64),
        num(summary.max as f64),
        num(summary.mean),
        num(summary.stdev)
    )
}
