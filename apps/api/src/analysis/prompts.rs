// All LLM prompt constants for the analysis module.
// Templates use `{slot}` placeholders resolved by `analysis::template`.

use crate::analysis::language::Language;

/// System instruction and user template for one report language.
pub struct CvPromptSet {
    pub system: &'static str,
    pub template: &'static str,
    pub job_description_section: &'static str,
    pub job_match_section: &'static str,
    pub job_skills_section: &'static str,
}

pub fn cv_prompt_set(language: Language) -> &'static CvPromptSet {
    match language {
        Language::Es => &CV_PROMPT_ES,
        Language::En => &CV_PROMPT_EN,
    }
}

static CV_PROMPT_ES: CvPromptSet = CvPromptSet {
    system: "Eres una IA especializada en análisis y optimización de CVs. \
        Tu tarea es analizar currículums, proporcionar sugerencias detalladas para mejorarlos, \
        considerar la compatibilidad con sistemas ATS específicos y generar informes completos. \
        Debes adaptar tus recomendaciones según los sistemas ATS seleccionados y, si está \
        disponible, la descripción del trabajo.",
    template: CV_TEMPLATE_ES,
    job_description_section: "<JOB_DESCRIPTION>\n{jobDescription}\n</JOB_DESCRIPTION>",
    job_match_section: "- Grado de coincidencia del CV con la descripción del trabajo",
    job_skills_section: "- Habilidades requeridas por el puesto que faltan en el CV",
};

static CV_PROMPT_EN: CvPromptSet = CvPromptSet {
    system: "You are an advanced CV analysis and optimization AI. \
        Your task is to analyze CVs, provide detailed suggestions for improvement, \
        consider compatibility with specific ATS systems, and generate comprehensive reports. \
        You must adapt your recommendations based on the selected ATS systems and, if \
        available, the job description.",
    template: CV_TEMPLATE_EN,
    job_description_section: "<JOB_DESCRIPTION>\n{jobDescription}\n</JOB_DESCRIPTION>",
    job_match_section: "- Degree of match between the CV and the job description",
    job_skills_section: "- Skills required by the role that are missing from the CV",
};

const CV_TEMPLATE_ES: &str = r#"Analiza este CV y proporciona un informe detallado siguiendo esta estructura:

1. Procesamiento de entrada:
<CV_TEXT>
{cvText}
</CV_TEXT>

<ATS_SYSTEMS>
{atsSystems}
</ATS_SYSTEMS>

{jobDescriptionSection}

2. Genera un informe detallado con:
a) Resumen Ejecutivo
   - Evaluación general del CV
   - Compatibilidad específica con cada sistema ATS seleccionado
   {jobMatchSection}

b) Análisis de Contenido
   - Palabras clave relevantes
   - Logros y métricas
   - Habilidades destacadas
   {jobSkillsSection}

c) Análisis de Estructura y Formato
   - Compatibilidad con ATS
   - Formato y legibilidad
   - Problemas específicos por sistema ATS

d) Análisis de Compatibilidad ATS
   [Para cada sistema ATS seleccionado:]
   - Problemas específicos
   - Recomendaciones particulares
   - Tasa de compatibilidad estimada

e) Mejoras Sugeridas
   [Organizadas por sistema ATS y prioridad]

Para cada sugerencia, categoriza como:
- Crítico (debe implementarse)
- Importante (muy recomendado)
- Menor (mejoras opcionales)

Marca las fortalezas con ✓, los puntos a mejorar con ⚠ y los problemas críticos con ❌.
Incluye el porcentaje de impacto estimado para cada sugerencia.

3. Puntuación:
- Puntuación inicial del CV (0-100, donde 100 es la máxima puntuación posible)
- Puntuación proyectada después de las mejoras (0-100)
- Desglose de puntuación por sistema ATS
- Explicación de los criterios de puntuación

Por favor, proporciona tu análisis en este formato:

<analysis_report>
[Tu informe detallado aquí]
</analysis_report>

<initial_score>
[Puntuación inicial del CV, número entre 0 y 100]
</initial_score>

<projected_score>
[Puntuación proyectada del CV después de las mejoras, número entre 0 y 100]
</projected_score>"#;

const CV_TEMPLATE_EN: &str = r#"Analyze this CV and provide a detailed report following this structure:

1. Input Processing:
<CV_TEXT>
{cvText}
</CV_TEXT>

<ATS_SYSTEMS>
{atsSystems}
</ATS_SYSTEMS>

{jobDescriptionSection}

2. Generate a detailed report with:
a) Executive Summary
   - Overall CV assessment
   - Specific compatibility with each selected ATS system
   {jobMatchSection}

b) Content Analysis
   - Relevant keywords
   - Achievements and metrics
   - Highlighted skills
   {jobSkillsSection}

c) Structure and Formatting Analysis
   - ATS compatibility
   - Format and readability
   - ATS-specific issues

d) ATS Compatibility Analysis
   [For each selected ATS system:]
   - Specific issues
   - Particular recommendations
   - Estimated compatibility rate

e) Suggested Improvements
   [Organized by ATS system and priority]

For each suggestion, categorize as:
- Critical (must be implemented)
- Important (strongly recommended)
- Minor (optional enhancements)

Mark strengths with ✓, areas to improve with ⚠ and critical problems with ❌.
Include estimated impact percentage for each suggestion.

3. Scoring:
- Initial CV score (0-100, where 100 is the highest possible score)
- Projected score after improvements (0-100)
- Score breakdown by ATS system
- Explanation of scoring criteria

Please provide your analysis in this format:

<analysis_report>
[Your detailed report here]
</analysis_report>

<initial_score>
[Initial CV score, number between 0 and 100]
</initial_score>

<projected_score>
[Projected CV score after improvements, number between 0 and 100]
</projected_score>"#;

/// System prompt for job description analysis.
pub const JOB_ANALYSIS_SYSTEM: &str = "You are an expert recruiter and ATS keyword analyst. \
    Extract the vocabulary an applicant tracking system will screen for in a job description. \
    Answer ONLY with the requested tagged sections, one item per line, no commentary.";

/// Job description analysis prompt. Slot: `{jobDescription}`.
pub const JOB_ANALYSIS_TEMPLATE: &str = r#"Analyze the following job description and extract what an ATS will screen candidates for.

<JOB_DESCRIPTION>
{jobDescription}
</JOB_DESCRIPTION>

Return your answer in exactly this format, one item per line, each line starting with "- ":

<keywords>
- [ATS keywords and key phrases, most important first]
</keywords>

<hard_skills>
- [Technical skills, tools, certifications]
</hard_skills>

<soft_skills>
- [Interpersonal and behavioural skills]
</soft_skills>

<requirements>
- [Explicit requirements: years of experience, degrees, languages, location]
</requirements>"#;
