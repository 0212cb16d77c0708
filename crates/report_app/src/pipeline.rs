//! Upload → parse → transform → render, for one request at a time.

use std::borrow::Cow;
use std::time::Instant;

use chrono::{Local, NaiveDateTime};
use report_core::{ReportConfig, ReportError};
use report_docs::{
    FULL_DATA_SHEET, PageSize, SUMMARY_SHEET, generate_csv, generate_xlsx, render_full_data_pdf,
    render_summary_pdf,
};
use report_frame::{Frame, SourceFormat, read_frame, summarize};
use tracing::{debug, error, info, warn};

use crate::request::{
    OutputFormat, ReportFile, ReportSelectors, ReportType, Upload, download_filename,
    secure_filename,
};

/// Turns uploads into report files. Holds only immutable configuration, so
/// one pipeline can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ReportPipeline {
    config: ReportConfig,
}

impl ReportPipeline {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Runs the whole pipeline, stamping PDFs with the current local time.
    pub fn generate(
        &self,
        upload: &Upload,
        selectors: &ReportSelectors,
    ) -> Result<ReportFile, ReportError> {
        self.generate_at(upload, selectors, Local::now().naive_local())
    }

    /// Like [`generate`](Self::generate) with a fixed generation timestamp.
    pub fn generate_at(
        &self,
        upload: &Upload,
        selectors: &ReportSelectors,
        generated_at: NaiveDateTime,
    ) -> Result<ReportFile, ReportError> {
        let started = Instant::now();
        let result = self.run(upload, selectors, generated_at);
        match &result {
            Ok(report) => info!(
                filename = %report.filename,
                mime_type = report.mime_type,
                size = report.bytes.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Report generated"
            ),
            Err(err) if err.status_code() >= 500 => {
                error!(upload = %upload.filename, "Report failed: {err}")
            }
            Err(err) => warn!(upload = %upload.filename, "Upload rejected: {err}"),
        }
        result
    }

    fn run(
        &self,
        upload: &Upload,
        selectors: &ReportSelectors,
        generated_at: NaiveDateTime,
    ) -> Result<ReportFile, ReportError> {
        let source = self.validate(upload)?;
        let frame = ingest(upload, source)?;
        info!(
            rows = frame.row_count(),
            columns = frame.column_count(),
            "Parsed {}",
            upload.filename
        );

        let format = OutputFormat::from_selector(&selectors.output_format)
            .ok_or(ReportError::InvalidOutputFormat)?;
        let report_type = ReportType::from_selector(&selectors.report_type);
        if report_type.is_none() {
            debug!(selector = %selectors.report_type, "Unknown report type");
        }

        let secured = secure_filename(&upload.filename);
        let bytes = match format {
            OutputFormat::Pdf => {
                render_pdf(&frame, report_type, &secured, selectors, generated_at)?
            }
            OutputFormat::Csv => {
                let table = report_table(&frame, report_type);
                generate_csv(&table).map_err(unexpected)?
            }
            OutputFormat::Excel => {
                let sheet = match report_type {
                    Some(ReportType::Summary) => SUMMARY_SHEET,
                    _ => FULL_DATA_SHEET,
                };
                let table = report_table(&frame, report_type);
                generate_xlsx(&table, sheet).map_err(unexpected)?
            }
        };

        Ok(ReportFile {
            bytes,
            filename: download_filename(&secured, report_type, format),
            mime_type: format.mime_type(),
        })
    }

    /// Filename, extension and size checks, in that order. Nothing is
    /// parsed until all of them pass.
    fn validate(&self, upload: &Upload) -> Result<SourceFormat, ReportError> {
        if upload.filename.is_empty() {
            return Err(ReportError::NoSelectedFile);
        }

        let source = upload
            .extension()
            .filter(|ext| self.config.is_allowed_extension(ext))
            .and_then(|ext| SourceFormat::from_extension(&ext))
            .ok_or(ReportError::DisallowedExtension)?;

        if upload.bytes.len() as u64 > self.config.max_file_size {
            return Err(ReportError::FileTooLarge {
                max_mb: self.config.max_file_size_mb(),
            });
        }

        Ok(source)
    }
}

fn ingest(upload: &Upload, source: SourceFormat) -> Result<Frame, ReportError> {
    read_frame(&upload.bytes, source).map_err(|e| match source {
        SourceFormat::Csv => ReportError::CsvParse(format!("{e:#}")),
        SourceFormat::Xlsx => ReportError::ExcelParse(format!("{e:#}")),
    })
}

/// The summary frame for summary reports, the parsed frame otherwise.
fn report_table(frame: &Frame, report_type: Option<ReportType>) -> Cow<'_, Frame> {
    match report_type {
        Some(ReportType::Summary) => Cow::Owned(summarize(frame).to_frame()),
        _ => Cow::Borrowed(frame),
    }
}

fn render_pdf(
    frame: &Frame,
    report_type: Option<ReportType>,
    title_filename: &str,
    selectors: &ReportSelectors,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, ReportError> {
    let pdf = match report_type.ok_or(ReportError::EmptyReport)? {
        ReportType::Summary => {
            render_summary_pdf(frame, &summarize(frame), title_filename, generated_at)
        }
        ReportType::FullData => render_full_data_pdf(
            frame,
            title_filename,
            PageSize::from_selector(&selectors.page_size),
            generated_at,
        ),
    }
    .map_err(unexpected)?;

    debug!(
        pages = pdf.page_count,
        tables = pdf.table_count,
        "PDF laid out"
    );
    Ok(pdf.bytes)
}

fn unexpected(err: anyhow::Error) -> ReportError {
    ReportError::Unexpected(format!("{err:#}"))
}
