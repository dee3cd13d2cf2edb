use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::database::store::WellnessStore;
use crate::error::{Error, Result};
use crate::models::exercise::{ExerciseTutorial, ExerciseUpdate, IntensityLevel};
use crate::models::question::{Question, QuestionOption, QuestionUpdate};
use crate::models::quiz::{Quiz, ScoringRule};
use crate::models::quiz_response::{QuizResponse, StoredAnswer};

const QUIZ_COLUMNS: &str =
    "id, name, description, is_active, created_by, created_at, updated_at";
const QUESTION_COLUMNS: &str =
    "id, quiz_id, text, question_type, weight, display_order, created_at, updated_at";
const RESPONSE_COLUMNS: &str = "id, user_id, quiz_id, response_date, total_score, \
     is_good_day_for_exercise, recommended_exercise_type, exercise_description, created_at";
const EXERCISE_COLUMNS: &str = "id, name, description, intensity_level, safety_guidelines, \
     video_link, created_at, updated_at";

#[derive(Debug, FromRow)]
struct QuizRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct QuestionRow {
    id: Uuid,
    quiz_id: Uuid,
    text: String,
    question_type: String,
    weight: Decimal,
    display_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuestionRow {
    fn into_question(self, options: Vec<QuestionOption>) -> Result<Question> {
        Ok(Question {
            id: self.id,
            quiz_id: self.quiz_id,
            text: self.text,
            question_type: self.question_type.parse().map_err(Error::Internal)?,
            weight: self.weight,
            order: self.display_order,
            options,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OptionRow {
    id: Uuid,
    question_id: Uuid,
    label: String,
    score_value: Decimal,
    display_order: i32,
}

impl From<OptionRow> for QuestionOption {
    fn from(row: OptionRow) -> Self {
        Self {
            id: row.id,
            question_id: row.question_id,
            label: row.label,
            // NUMERIC(5, 2) pads the scale; answer tokens are matched against the bare value.
            score_value: row.score_value.normalize(),
            order: row.display_order,
        }
    }
}

#[derive(Debug, FromRow)]
struct RuleRow {
    id: Uuid,
    quiz_id: Uuid,
    min_score: Decimal,
    max_score: Decimal,
    is_good_day: bool,
    recommended_exercise_type: String,
    exercise_description: Option<String>,
}

impl From<RuleRow> for ScoringRule {
    fn from(row: RuleRow) -> Self {
        Self {
            id: row.id,
            quiz_id: row.quiz_id,
            min_score: row.min_score,
            max_score: row.max_score,
            is_good_day: row.is_good_day,
            recommended_exercise_type: row.recommended_exercise_type,
            exercise_description: row.exercise_description,
        }
    }
}

#[derive(Debug, FromRow)]
struct ResponseRow {
    id: Uuid,
    user_id: Uuid,
    quiz_id: Uuid,
    response_date: NaiveDate,
    total_score: Decimal,
    is_good_day_for_exercise: bool,
    recommended_exercise_type: String,
    exercise_description: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct AnswerRow {
    response_id: Uuid,
    question_id: Uuid,
    answer_value: String,
}

#[derive(Debug, FromRow)]
struct ExerciseRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    intensity_level: String,
    safety_guidelines: Option<String>,
    video_link: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ExerciseRow> for ExerciseTutorial {
    type Error = Error;

    fn try_from(row: ExerciseRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            intensity_level: row.intensity_level.parse().map_err(Error::Internal)?,
            safety_guidelines: row.safety_guidelines,
            video_link: row.video_link,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn load_options(conn: &mut PgConnection, question_ids: &[Uuid]) -> Result<Vec<OptionRow>> {
    let rows = sqlx::query_as::<_, OptionRow>(
        r#"
        SELECT id, question_id, label, score_value, display_order
        FROM quiz_question_options
        WHERE question_id = ANY($1)
        ORDER BY display_order
        "#,
    )
    .bind(question_ids)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// Attaches questions, options and scoring rules to the given quiz rows.
async fn assemble_quizzes(conn: &mut PgConnection, rows: Vec<QuizRow>) -> Result<Vec<Quiz>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let quiz_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let question_rows = sqlx::query_as::<_, QuestionRow>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM quiz_questions WHERE quiz_id = ANY($1) ORDER BY display_order"
    ))
    .bind(&quiz_ids)
    .fetch_all(&mut *conn)
    .await?;

    let question_ids: Vec<Uuid> = question_rows.iter().map(|row| row.id).collect();
    let mut options_by_question: HashMap<Uuid, Vec<QuestionOption>> = HashMap::new();
    for row in load_options(conn, &question_ids).await? {
        options_by_question
            .entry(row.question_id)
            .or_default()
            .push(row.into());
    }

    let rule_rows = sqlx::query_as::<_, RuleRow>(
        r#"
        SELECT id, quiz_id, min_score, max_score, is_good_day,
               recommended_exercise_type, exercise_description
        FROM scoring_rules
        WHERE quiz_id = ANY($1)
        ORDER BY min_score
        "#,
    )
    .bind(&quiz_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut questions_by_quiz: HashMap<Uuid, Vec<Question>> = HashMap::new();
    for row in question_rows {
        let options = options_by_question.remove(&row.id).unwrap_or_default();
        let quiz_id = row.quiz_id;
        questions_by_quiz
            .entry(quiz_id)
            .or_default()
            .push(row.into_question(options)?);
    }

    let mut rules_by_quiz: HashMap<Uuid, Vec<ScoringRule>> = HashMap::new();
    for row in rule_rows {
        rules_by_quiz.entry(row.quiz_id).or_default().push(row.into());
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let mut quiz = Quiz {
                id: row.id,
                name: row.name,
                description: row.description,
                is_active: row.is_active,
                created_by: row.created_by,
                created_at: row.created_at,
                updated_at: row.updated_at,
                questions: questions_by_quiz.remove(&row.id).unwrap_or_default(),
                scoring_rules: rules_by_quiz.remove(&row.id).unwrap_or_default(),
            };
            quiz.normalize();
            quiz
        })
        .collect())
}

async fn assemble_responses(
    conn: &mut PgConnection,
    rows: Vec<ResponseRow>,
) -> Result<Vec<QuizResponse>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let response_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let answer_rows = sqlx::query_as::<_, AnswerRow>(
        r#"
        SELECT response_id, question_id, answer_value
        FROM quiz_response_answers
        WHERE response_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(&response_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut answers_by_response: HashMap<Uuid, Vec<StoredAnswer>> = HashMap::new();
    for row in answer_rows {
        answers_by_response
            .entry(row.response_id)
            .or_default()
            .push(StoredAnswer {
                question_id: row.question_id,
                answer_value: row.answer_value,
            });
    }

    Ok(rows
        .into_iter()
        .map(|row| QuizResponse {
            answers: answers_by_response.remove(&row.id).unwrap_or_default(),
            id: row.id,
            user_id: row.user_id,
            quiz_id: row.quiz_id,
            response_date: row.response_date,
            total_score: row.total_score,
            is_good_day_for_exercise: row.is_good_day_for_exercise,
            recommended_exercise_type: row.recommended_exercise_type,
            exercise_description: row.exercise_description,
            created_at: row.created_at,
        })
        .collect())
}

async fn insert_question_rows(conn: &mut PgConnection, question: &Question) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO quiz_questions
            (id, quiz_id, text, question_type, weight, display_order, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(question.id)
    .bind(question.quiz_id)
    .bind(&question.text)
    .bind(question.question_type.as_str())
    .bind(question.weight)
    .bind(question.order)
    .bind(question.created_at)
    .bind(question.updated_at)
    .execute(&mut *conn)
    .await?;

    for option in &question.options {
        sqlx::query(
            r#"
            INSERT INTO quiz_question_options (id, question_id, label, score_value, display_order)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(option.id)
        .bind(question.id)
        .bind(&option.label)
        .bind(option.score_value)
        .bind(option.order)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_rule_rows(conn: &mut PgConnection, rules: &[ScoringRule]) -> Result<()> {
    for rule in rules {
        sqlx::query(
            r#"
            INSERT INTO scoring_rules
                (id, quiz_id, min_score, max_score, is_good_day,
                 recommended_exercise_type, exercise_description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(rule.id)
        .bind(rule.quiz_id)
        .bind(rule.min_score)
        .bind(rule.max_score)
        .bind(rule.is_good_day)
        .bind(&rule.recommended_exercise_type)
        .bind(&rule.exercise_description)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_quiz_rows(conn: &mut PgConnection, quiz: &Quiz) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO quizzes (id, name, description, is_active, created_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(quiz.id)
    .bind(&quiz.name)
    .bind(&quiz.description)
    .bind(quiz.is_active)
    .bind(quiz.created_by)
    .bind(quiz.created_at)
    .bind(quiz.updated_at)
    .execute(&mut *conn)
    .await?;

    for question in &quiz.questions {
        insert_question_rows(conn, question).await?;
    }
    insert_rule_rows(conn, &quiz.scoring_rules).await
}

async fn quiz_exists(conn: &mut PgConnection, quiz_id: Uuid) -> Result<bool> {
    let found: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM quizzes WHERE id = $1 FOR UPDATE")
            .bind(quiz_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(found.is_some())
}

impl WellnessStore for PgStore {
    async fn active_quiz(&self) -> Result<Option<Quiz>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;
        let rows = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE is_active LIMIT 1"
        ))
        .fetch_all(&mut *tx)
        .await?;
        let quiz = assemble_quizzes(&mut tx, rows).await?.into_iter().next();
        tx.commit().await?;
        Ok(quiz)
    }

    async fn quiz_by_id(&self, quiz_id: Uuid) -> Result<Option<Quiz>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;
        let rows = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"
        ))
        .bind(quiz_id)
        .fetch_all(&mut *tx)
        .await?;
        let quiz = assemble_quizzes(&mut tx, rows).await?.into_iter().next();
        tx.commit().await?;
        Ok(quiz)
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes ORDER BY created_at DESC"
        ))
        .fetch_all(&mut *tx)
        .await?;
        let quizzes = assemble_quizzes(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(quizzes)
    }

    async fn insert_quiz(&self, quiz: &Quiz) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        if quiz.is_active {
            sqlx::query("UPDATE quizzes SET is_active = FALSE, updated_at = NOW() WHERE is_active")
                .execute(&mut *tx)
                .await?;
        }
        insert_quiz_rows(&mut tx, quiz).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn bootstrap_quiz(&self, quiz: &Quiz) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let active: Option<Uuid> = sqlx::query_scalar("SELECT id FROM quizzes WHERE is_active")
            .fetch_optional(&mut *tx)
            .await?;
        if active.is_some() {
            tx.rollback().await?;
            return Ok(false);
        }
        let mut quiz = quiz.clone();
        quiz.is_active = true;
        // A concurrent bootstrap loses on the single-active index.
        match insert_quiz_rows(&mut tx, &quiz).await {
            Ok(()) => {}
            Err(Error::Conflict(_)) => return Ok(false),
            Err(err) => return Err(err),
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn activate_quiz(&self, quiz_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        if !quiz_exists(&mut tx, quiz_id).await? {
            tx.rollback().await?;
            return Ok(false);
        }
        sqlx::query(
            "UPDATE quizzes SET is_active = FALSE, updated_at = NOW() WHERE is_active AND id <> $1",
        )
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE quizzes SET is_active = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(quiz_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn insert_question(&self, question: &Question) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        if !quiz_exists(&mut tx, question.quiz_id).await? {
            return Err(Error::NotFound(format!("Quiz {} not found", question.quiz_id)));
        }
        insert_question_rows(&mut tx, question).await?;
        sqlx::query("UPDATE quizzes SET updated_at = NOW() WHERE id = $1")
            .bind(question.quiz_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_question(
        &self,
        question_id: Uuid,
        update: &QuestionUpdate,
    ) -> Result<Option<Question>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            UPDATE quiz_questions
            SET text = COALESCE($1, text),
                weight = COALESCE($2, weight),
                display_order = COALESCE($3, display_order),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(&update.text)
        .bind(update.weight)
        .bind(update.order)
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let options = load_options(&mut tx, &[question_id])
            .await?
            .into_iter()
            .map(QuestionOption::from)
            .collect();
        tx.commit().await?;
        Ok(Some(row.into_question(options)?))
    }

    async fn delete_question(&self, question_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quiz_questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_scoring_rules(&self, quiz_id: Uuid, rules: &[ScoringRule]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        if !quiz_exists(&mut tx, quiz_id).await? {
            return Err(Error::NotFound(format!("Quiz {} not found", quiz_id)));
        }
        sqlx::query("DELETE FROM scoring_rules WHERE quiz_id = $1")
            .bind(quiz_id)
            .execute(&mut *tx)
            .await?;
        insert_rule_rows(&mut tx, rules).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn response_for_day(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<QuizResponse>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, ResponseRow>(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM quiz_responses \
             WHERE user_id = $1 AND quiz_id = $2 AND response_date = $3"
        ))
        .bind(user_id)
        .bind(quiz_id)
        .bind(date)
        .fetch_all(&mut *conn)
        .await?;
        Ok(assemble_responses(&mut conn, rows).await?.into_iter().next())
    }

    async fn insert_response(&self, response: &QuizResponse) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO quiz_responses
                (id, user_id, quiz_id, response_date, total_score, is_good_day_for_exercise,
                 recommended_exercise_type, exercise_description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(response.id)
        .bind(response.user_id)
        .bind(response.quiz_id)
        .bind(response.response_date)
        .bind(response.total_score)
        .bind(response.is_good_day_for_exercise)
        .bind(&response.recommended_exercise_type)
        .bind(&response.exercise_description)
        .bind(response.created_at)
        .execute(&mut *tx)
        .await?;

        let question_ids: Vec<Uuid> = response.answers.iter().map(|a| a.question_id).collect();
        let values: Vec<String> = response
            .answers
            .iter()
            .map(|a| a.answer_value.clone())
            .collect();
        sqlx::query(
            r#"
            INSERT INTO quiz_response_answers (response_id, question_id, answer_value)
            SELECT $1, question_id, answer_value
            FROM UNNEST($2::uuid[], $3::text[]) WITH ORDINALITY AS a(question_id, answer_value, position)
            ORDER BY position
            "#,
        )
        .bind(response.id)
        .bind(&question_ids)
        .bind(&values)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn responses_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<QuizResponse>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, ResponseRow>(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM quiz_responses WHERE user_id = $1 \
             ORDER BY response_date DESC, created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
        assemble_responses(&mut conn, rows).await
    }

    async fn list_exercises(
        &self,
        intensity: Option<IntensityLevel>,
    ) -> Result<Vec<ExerciseTutorial>> {
        let rows = sqlx::query_as::<_, ExerciseRow>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercise_tutorials \
             WHERE ($1::text IS NULL OR intensity_level = $1) \
             ORDER BY created_at, name"
        ))
        .bind(intensity.map(|level| level.as_str()))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ExerciseTutorial::try_from).collect()
    }

    async fn count_exercises(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercise_tutorials")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_exercises(&self, exercises: &[ExerciseTutorial]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for exercise in exercises {
            sqlx::query(
                r#"
                INSERT INTO exercise_tutorials
                    (id, name, description, intensity_level, safety_guidelines,
                     video_link, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(exercise.id)
            .bind(&exercise.name)
            .bind(&exercise.description)
            .bind(exercise.intensity_level.as_str())
            .bind(&exercise.safety_guidelines)
            .bind(&exercise.video_link)
            .bind(exercise.created_at)
            .bind(exercise.updated_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_exercise(
        &self,
        exercise_id: Uuid,
        update: &ExerciseUpdate,
    ) -> Result<Option<ExerciseTutorial>> {
        let row = sqlx::query_as::<_, ExerciseRow>(&format!(
            r#"
            UPDATE exercise_tutorials
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                intensity_level = COALESCE($3, intensity_level),
                safety_guidelines = COALESCE($4, safety_guidelines),
                video_link = COALESCE($5, video_link),
                updated_at = NOW()
            WHERE id = $6
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.intensity_level.map(|level| level.as_str()))
        .bind(&update.safety_guidelines)
        .bind(&update.video_link)
        .bind(exercise_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ExerciseTutorial::try_from).transpose()
    }

    async fn delete_exercise(&self, exercise_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM exercise_tutorials WHERE id = $1")
            .bind(exercise_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
