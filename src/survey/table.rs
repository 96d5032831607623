use std::collections::HashMap;

/// A single survey cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Blank,
    Number(f64),
    Text(String),
}

impl Answer {
    /// Parse a raw cell. Empty cells are blank, numeric cells are numbers
    /// (decimal comma accepted), anything else is kept as free text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Answer::Blank;
        }
        let number = raw
            .parse::<f64>()
            .or_else(|_| raw.replace(',', ".").parse::<f64>());
        match number {
            Ok(v) if v.is_finite() => Answer::Number(v),
            // NaN and infinities read as missing answers.
            Ok(_) => Answer::Blank,
            Err(_) => Answer::Text(raw.to_string()),
        }
    }

    /// Numeric reading used for scoring. Blank and text read as 0.
    pub fn value(&self) -> f64 {
        match self {
            Answer::Number(v) => *v,
            Answer::Blank | Answer::Text(_) => 0.0,
        }
    }

    /// True when the cell carries any non-zero answer, free text included.
    pub fn is_answered(&self) -> bool {
        match self {
            Answer::Blank => false,
            Answer::Number(v) => *v != 0.0,
            Answer::Text(_) => true,
        }
    }
}

/// Survey answers, one row per model and one column per survey item.
///
/// Built once by the loader and never mutated afterwards, so it can be shared
/// across scoring threads by reference.
#[derive(Debug, Clone, Default)]
pub struct SurveyTable {
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    models: Vec<String>,
    model_index: HashMap<String, usize>,
    cells: Vec<Vec<Answer>>,
}

impl SurveyTable {
    /// Build a table from column names and `(model, answers)` rows.
    ///
    /// Short rows are padded with blanks. Returns the offending name when a
    /// column or model appears twice.
    pub fn new(
        columns: Vec<String>,
        rows: Vec<(String, Vec<Answer>)>,
    ) -> Result<Self, DuplicateName> {
        let mut column_index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if column_index.insert(name.clone(), i).is_some() {
                return Err(DuplicateName::Column(name.clone()));
            }
        }

        let mut models = Vec::with_capacity(rows.len());
        let mut model_index = HashMap::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(rows.len());
        for (model, mut answers) in rows {
            if model_index.insert(model.clone(), models.len()).is_some() {
                return Err(DuplicateName::Model(model));
            }
            answers.resize(columns.len(), Answer::Blank);
            models.push(model);
            cells.push(answers);
        }

        Ok(Self {
            columns,
            column_index,
            models,
            model_index,
            cells,
        })
    }

    /// Convenience constructor for numeric tables (tests, generated data).
    pub fn from_values(columns: &[&str], rows: &[(&str, &[f64])]) -> Result<Self, DuplicateName> {
        Self::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|(model, values)| {
                    (
                        model.to_string(),
                        values.iter().map(|v| Answer::Number(*v)).collect(),
                    )
                })
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Model names in file order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index.contains_key(column)
    }

    pub fn has_model(&self, model: &str) -> bool {
        self.model_index.contains_key(model)
    }

    pub fn row(&self, model: &str) -> Option<ModelRow<'_>> {
        self.model_index.get(model).map(|&idx| ModelRow {
            table: self,
            model: &self.models[idx],
            idx,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = ModelRow<'_>> {
        self.models.iter().enumerate().map(move |(idx, model)| ModelRow {
            table: self,
            model,
            idx,
        })
    }

    /// Raw answer, or `None` for an unknown model or column.
    pub fn answer(&self, model: &str, column: &str) -> Option<&Answer> {
        let row = *self.model_index.get(model)?;
        let col = *self.column_index.get(column)?;
        self.cells[row].get(col)
    }
}

/// Read-only view of one model's answers.
#[derive(Debug, Clone, Copy)]
pub struct ModelRow<'a> {
    table: &'a SurveyTable,
    model: &'a str,
    idx: usize,
}

impl<'a> ModelRow<'a> {
    pub fn model(&self) -> &'a str {
        self.model
    }

    pub fn answer(&self, column: &str) -> &'a Answer {
        static BLANK: Answer = Answer::Blank;
        match self.table.column_index.get(column) {
            Some(&col) => &self.table.cells[self.idx][col],
            None => &BLANK,
        }
    }

    /// Numeric value; unknown columns read as 0.
    pub fn value(&self, column: &str) -> f64 {
        self.answer(column).value()
    }

    /// A flag is set when its value is exactly 1.
    pub fn flag(&self, column: &str) -> bool {
        self.value(column) == 1.0
    }

    pub fn any_flag(&self, columns: &[&str]) -> bool {
        columns.iter().any(|c| self.flag(c))
    }

    pub fn is_answered(&self, column: &str) -> bool {
        self.answer(column).is_answered()
    }

    pub fn text(&self, column: &str) -> Option<&'a str> {
        match self.answer(column) {
            Answer::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateName {
    Column(String),
    Model(String),
}
