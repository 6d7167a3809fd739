// README generation prompt.

use super::github::RepoFile;

/// Paths listed in the prompt; large repositories are cut off here.
pub const MAX_LISTED_FILES: usize = 50;

const INSTRUCTIONS: &str = r#"You are a professional README.md generator.
When generating the README.md content, internally think through the project files carefully step-by-step, understanding the project purpose, main features, usage, and other relevant details.
Use this chain of thought reasoning to produce a clean, comprehensive, and well-structured README.md file in valid GitHub Markdown format.
Include typical sections such as Project Title, Description, Features, Tech Stack, Installation (setting up the project in local), Environment Variables (optional), ScreenShots (optional), Contributing, License, and any other useful information inferred from the files.
Strictly output only the final README.md content as valid Markdown, without explanations, metadata, code fences, or any intermediate reasoning text.
note:
1. **Command formatting**
   - **All shell/terminal commands must be inside fenced code blocks labeled bash**. Example:
     ```bash
     npm install
     npm run dev
     ```
   - Use language-specific fenced code blocks for code examples (e.g., js, python, sql) where appropriate.
   - Do **not** use inline commands without fences; always provide copy-paste ready command blocks.

2. If a line contains subheadings, highlight them (strong) and use bullet points for lists.

3. For screenshots, always write them in the format:
   **Name:** ![Name](path/to/image.png)

4. If environment variable files exist (like `.env`, `frontend/.env`, `backend/.env`, etc.), add a section titled "Environment Variables".

For each `.env` file, show:
1. The file path (e.g., `frontend/.env`, `backend/.env`).
2. A list of variables used in that file.
3. A short description of what each variable controls.
4. Clear instructions that users must open that specific file and change the values as needed.

Important: When referencing files or folders from the repository, do not rename, fix typos, or assume corrections. Always use the file/folder names exactly as they exist in the repo. If they look incorrect, still use them as-is."#;

/// Render the generation prompt for a repository tree.
pub fn render_generation_prompt(files: &[RepoFile]) -> String {
    let listing: Vec<&str> = files
        .iter()
        .take(MAX_LISTED_FILES)
        .map(|f| f.path.as_str())
        .collect();

    format!(
        "{INSTRUCTIONS}\n\nGenerate README for this repo. Files:\n{}\n",
        listing.join("\n")
    )
}
