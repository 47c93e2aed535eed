use anyhow::Result;

/// Extract → validate → transform → load seam shared by the batch jobs.
/// The Elo components plug in at the transform stage.
pub trait EtlJob {
    type Extracted;
    type Transformed;

    fn extract(&mut self) -> Result<Self::Extracted>;

    /// Fails the batch before any computation when the extracted data
    /// cannot support the requested run (e.g. missing meta coverage).
    fn validate(&self, extracted: &Self::Extracted) -> Result<()>;

    fn transform(&mut self, extracted: Self::Extracted) -> Result<Self::Transformed>;

    fn load(&mut self, transformed: Self::Transformed) -> Result<()>;

    /// Executes all stages of the pipeline. Any stage error aborts the
    /// batch before `load` publishes anything.
    fn run(&mut self) -> Result<()> {
        let extracted = self.extract()?;
        self.validate(&extracted)?;
        let transformed = self.transform(extracted)?;
        self.load(transformed)
    }
}
