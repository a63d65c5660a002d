use crate::theme::DailyTheme;

pub fn render_index(theme: &DailyTheme) -> String {
    INDEX_HTML
        .replace("{{THEME_TITLE}}", &escape_html(theme.title))
        .replace("{{THEME_CATEGORY}}", &escape_html(theme.category))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Grammar Story</title>
  <style>
    :root {
      --bg: #f1f5f9;
      --ink: #1e293b;
      --muted: #64748b;
      --accent: #2563eb;
      --ok: #16a34a;
      --bad: #dc2626;
      --card: #ffffff;
      --shadow: 0 10px 30px rgba(15, 23, 42, 0.08);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Georgia", "Times New Roman", serif;
    }

    header {
      position: sticky;
      top: 0;
      background: rgba(255, 255, 255, 0.9);
      backdrop-filter: blur(8px);
      box-shadow: 0 1px 4px rgba(15, 23, 42, 0.08);
      display: flex;
      align-items: center;
      justify-content: space-between;
      padding: 12px 24px;
    }

    header h1 { font-size: 1.3rem; margin: 0; }

    nav button {
      border: none;
      background: transparent;
      padding: 8px 14px;
      border-radius: 8px;
      font: inherit;
      cursor: pointer;
      color: var(--muted);
    }

    nav button.active { background: var(--accent); color: #fff; }

    main { max-width: 1100px; margin: 0 auto; padding: 24px; }

    .view { display: none; gap: 24px; }
    .view.active { display: grid; }
    .two { grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); }

    .card {
      background: var(--card);
      border-radius: 14px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .theme-banner {
      border-left: 4px solid var(--accent);
      background: #eff6ff;
      padding: 12px 16px;
      border-radius: 0 10px 10px 0;
      margin-bottom: 12px;
    }

    textarea {
      width: 100%;
      min-height: 240px;
      padding: 12px;
      font: inherit;
      border: 1px solid #cbd5e1;
      border-radius: 10px;
      resize: vertical;
    }

    button.primary {
      margin-top: 12px;
      padding: 10px 18px;
      border: none;
      border-radius: 10px;
      background: var(--accent);
      color: #fff;
      font: inherit;
      cursor: pointer;
    }

    button.primary:disabled { background: #94a3b8; cursor: not-allowed; }

    .mark { background: #fee2e2; border-radius: 4px; padding: 0 2px; cursor: help; }
    .error { color: var(--bad); }
    .ok { color: var(--ok); }
    .muted { color: var(--muted); }
    .strike { text-decoration: line-through; color: var(--bad); }
    ul.plain { list-style: none; padding: 0; margin: 0; display: grid; gap: 10px; }
    ul.plain li { border: 1px solid #e2e8f0; border-radius: 10px; padding: 10px 12px; }
    .row { display: flex; justify-content: space-between; align-items: start; gap: 12px; }
    .small { font-size: 0.85rem; }
    .levels button { margin-right: 6px; }
    .levels button.active { border-bottom: 2px solid var(--accent); color: var(--accent); }
    input.blank {
      width: 8rem;
      margin: 0 4px;
      border: none;
      border-bottom: 2px solid #cbd5e1;
      background: transparent;
      font: inherit;
    }
    input.blank.right { border-color: var(--ok); color: var(--ok); }
    input.blank.wrong { border-color: var(--bad); color: var(--bad); }
    .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(140px, 1fr)); gap: 12px; }
    .stat { background: #f8fafc; border-radius: 10px; padding: 12px; }
    .stat strong { display: block; font-size: 1.5rem; }
    table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
    td { padding: 4px 6px; border-bottom: 1px solid #e2e8f0; }
    .pill { font-size: 0.75rem; padding: 2px 8px; border-radius: 999px; background: #e2e8f0; }
  </style>
</head>
<body>
  <header>
    <h1>Grammar Story</h1>
    <nav>
      <button data-view="write" class="active">Write Story</button>
      <button data-view="theory">Theory</button>
      <button data-view="challenges">Challenges</button>
      <button data-view="progress">Progress</button>
    </nav>
  </header>

  <main>
    <section id="view-write" class="view two active">
      <div class="card">
        <h2>Write Your Story</h2>
        <div class="theme-banner">
          <strong>Today's Theme: {{THEME_TITLE}}</strong>
          <p id="prompt" class="small">Generating a creative prompt for you...</p>
        </div>
        <textarea id="story" placeholder="Tell me about your day..."></textarea>
        <button id="analyze" class="primary">Analyze My Writing</button>
      </div>
      <div class="card">
        <h2>Analysis Results</h2>
        <p id="analysis-status" class="muted">Your analysis results will appear here.</p>
        <div id="highlighted"></div>
        <ul id="mistakes" class="plain"></ul>
      </div>
    </section>

    <section id="view-theory" class="view">
      <div class="card">
        <h2 id="theory-title">Theory</h2>
        <p id="theory-intro" class="muted"></p>
        <p class="small muted">Examples are dynamically generated by AI and refresh every 12 hours.</p>
        <p id="examples-status" class="small error"></p>
      </div>
      <div id="theory-sections"></div>
    </section>

    <section id="view-challenges" class="view">
      <div class="card">
        <h2>Today's Focus: {{THEME_TITLE}}</h2>
        <p class="muted small">New challenges are generated daily for the {{THEME_CATEGORY}} theme.</p>
        <div class="levels">
          <button data-level="Easy" class="active">Easy</button>
          <button data-level="Medium">Medium</button>
          <button data-level="Hard">Hard</button>
        </div>
        <p id="challenge-status" class="muted">Generating today's challenges with AI...</p>
      </div>
      <div id="challenge-list" class="view active"></div>
    </section>

    <section id="view-progress" class="view">
      <div class="card">
        <h2>Today's Activity</h2>
        <div id="today-stats" class="stats"></div>
      </div>
      <div class="card">
        <h2>Challenge Statistics</h2>
        <div id="challenge-stats" class="stats"></div>
      </div>
      <div class="card">
        <h2>Mistake Bank</h2>
        <ul id="mistake-bank" class="plain"></ul>
      </div>
      <div class="card">
        <h2>Completed Challenges</h2>
        <ul id="completed" class="plain"></ul>
      </div>
    </section>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    const el = (tag, attrs = {}, ...children) => {
      const node = document.createElement(tag);
      Object.entries(attrs).forEach(([key, value]) => {
        if (key === 'class') node.className = value;
        else if (key.startsWith('on')) node.addEventListener(key.slice(2), value);
        else node.setAttribute(key, value);
      });
      children.flat().forEach((child) => {
        node.append(child instanceof Node ? child : document.createTextNode(String(child)));
      });
      return node;
    };

    const api = async (path, options = {}) => {
      const res = await fetch(path, {
        headers: { 'content-type': 'application/json' },
        ...options
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      if (res.status === 204) return null;
      const text = await res.text();
      return text ? JSON.parse(text) : null;
    };

    const loaded = {};
    let activeLevel = 'Easy';
    let savedIds = new Set();

    const showView = (name) => {
      document.querySelectorAll('nav button').forEach((b) => b.classList.toggle('active', b.dataset.view === name));
      document.querySelectorAll('main > .view').forEach((v) => v.classList.toggle('active', v.id === `view-${name}`));
      if (name === 'theory' && !loaded.theory) { loaded.theory = true; loadTheory(); }
      if (name === 'challenges' && !loaded.challenges) { loaded.challenges = true; loadChallenges(); }
      if (name === 'progress') loadProgress();
    };

    document.querySelectorAll('nav button').forEach((b) => b.addEventListener('click', () => showView(b.dataset.view)));

    const loadPrompt = async () => {
      try {
        const data = await api('/api/prompt');
        $('prompt').textContent = data.prompt;
      } catch (err) {
        $('prompt').textContent = err.message;
        $('prompt').className = 'small error';
      }
    };

    const refreshSaved = async () => {
      try {
        const report = await api('/api/progress');
        savedIds = new Set(report.mistakeBank.map((m) => m.id));
      } catch (_) {}
    };

    const renderAnalysis = (result) => {
      const highlighted = $('highlighted');
      highlighted.replaceChildren();
      const list = $('mistakes');
      list.replaceChildren();
      const byId = Object.fromEntries(result.errors.map((e) => [e.id, e]));
      if (result.errors.length === 0) {
        $('analysis-status').textContent = 'No errors found! Great job.';
        $('analysis-status').className = 'ok';
        return;
      }
      $('analysis-status').textContent = 'Your Corrected Story:';
      $('analysis-status').className = '';
      const para = el('p');
      result.segments.forEach((segment) => {
        if (segment.kind === 'plain') {
          para.append(segment.text);
        } else {
          const error = byId[segment.errorId];
          para.append(el('span', { class: 'mark', title: `${error.correctedText} - ${error.explanation}` }, segment.text));
        }
      });
      highlighted.append(para, el('h3', {}, 'Mistakes Found:'));
      result.errors.forEach((error) => {
        const save = el('button', {
          onclick: async () => {
            save.disabled = true;
            try {
              await api('/api/mistakes', { method: 'POST', body: JSON.stringify(error) });
              savedIds.add(error.id);
              save.textContent = 'Saved';
            } catch (err) {
              save.disabled = false;
              alert(err.message);
            }
          }
        }, savedIds.has(error.id) ? 'Saved' : 'Save');
        save.disabled = savedIds.has(error.id);
        list.append(el('li', {}, el('div', { class: 'row' },
          el('div', {},
            el('div', { class: 'strike small' }, error.originalText),
            el('div', { class: 'ok small' }, error.correctedText),
            el('div', { class: 'muted small' }, error.explanation)),
          save)));
      });
    };

    $('analyze').addEventListener('click', async () => {
      const text = $('story').value;
      if (!text.trim()) {
        $('analysis-status').textContent = 'Please write something before analyzing.';
        $('analysis-status').className = 'error';
        return;
      }
      const button = $('analyze');
      button.disabled = true;
      button.textContent = 'Analyzing...';
      $('analysis-status').textContent = 'Our AI is reading your story...';
      $('analysis-status').className = 'muted';
      $('highlighted').replaceChildren();
      $('mistakes').replaceChildren();
      try {
        await refreshSaved();
        renderAnalysis(await api('/api/analyze', { method: 'POST', body: JSON.stringify({ text }) }));
      } catch (err) {
        $('analysis-status').textContent = err.message;
        $('analysis-status').className = 'error';
      } finally {
        button.disabled = false;
        button.textContent = 'Analyze My Writing';
      }
    });

    const formulaTable = (title, formula) => el('div', {},
      el('h4', {}, title),
      el('table', {}, el('tbody', {},
        el('tr', {}, el('td', {}, '(+) Affirmative'), el('td', {}, formula.affirmative)),
        el('tr', {}, el('td', {}, '(-) Negative'), el('td', {}, formula.negative)),
        el('tr', {}, el('td', {}, '(?) Yes/No'), el('td', {}, formula.yesNoQuestion)),
        el('tr', {}, el('td', {}, '(?) WH-'), el('td', {}, formula.whQuestion)))));

    const loadTheory = async () => {
      const guide = await api('/api/theory');
      $('theory-title').textContent = guide.title;
      $('theory-intro').textContent = guide.introduction;
      const container = $('theory-sections');
      const exampleLists = {};
      guide.sections.forEach((section) => {
        const grid = el('div', { class: 'view two active' });
        section.tenses.forEach((tense) => {
          const examples = el('ul', { class: 'small' }, el('li', { class: 'muted' }, 'Loading examples...'));
          exampleLists[tense.name] = examples;
          grid.append(el('div', { class: 'card' },
            el('h3', {}, tense.name),
            el('p', { class: 'muted small' }, tense.definition),
            tense.tobeFormula ? formulaTable("With Verb 'to be'", tense.tobeFormula) : [],
            formulaTable(tense.tobeFormula ? 'With Regular Verbs' : 'Formulas', tense.regularFormula),
            el('h4', {}, 'How to Use'),
            el('ul', { class: 'small' }, tense.usage.map((u) => el('li', {}, u))),
            el('h4', {}, 'Common Signals'),
            el('div', {}, tense.signals.map((s) => el('span', { class: 'pill' }, s, ' '))),
            el('h4', {}, 'AI Generated Examples'),
            examples));
        });
        container.append(el('h2', {}, section.title), grid);
      });
      try {
        const examples = await api('/api/theory/examples');
        Object.entries(exampleLists).forEach(([name, list]) => {
          list.replaceChildren(...(examples[name] || []).map((e) => el('li', {}, `"${e}"`)));
        });
      } catch (err) {
        $('examples-status').textContent = err.message;
        Object.values(exampleLists).forEach((list) => list.replaceChildren());
      }
    };

    const challengeCard = (card) => {
      const { challenge } = card;
      const answers = card.completed ? card.completed.userAnswers : challenge.solution.map(() => '');
      const inputs = [];
      const story = el('p');
      card.storyParts.forEach((part, index) => {
        story.append(part);
        if (index < card.storyParts.length - 1) {
          const input = el('input', { class: 'blank', 'aria-label': `Blank ${index + 1}` });
          input.value = answers[index] || '';
          if (card.grade) {
            input.disabled = true;
            input.classList.add(card.grade.perBlank[index] ? 'right' : 'wrong');
          }
          inputs.push(input);
          story.append(input);
        }
      });
      const feedback = el('div', { class: 'small' });
      const showResult = (grade, solution) => {
        inputs.forEach((input, i) => {
          input.disabled = true;
          input.classList.add(grade.perBlank[i] ? 'right' : 'wrong');
        });
        feedback.replaceChildren(grade.isCorrect
          ? el('p', { class: 'ok' }, 'Congratulations! You completed the challenge perfectly.')
          : el('p', {}, 'Some answers were incorrect. Correct answers: ', el('code', {}, solution.join(', '))));
      };
      const submit = el('button', {
        class: 'primary',
        onclick: async () => {
          submit.disabled = true;
          try {
            const result = await api(`/api/challenges/${encodeURIComponent(challenge.id)}/submit`, {
              method: 'POST',
              body: JSON.stringify({ answers: inputs.map((i) => i.value) })
            });
            submit.remove();
            showResult(result.grade, result.solution);
          } catch (err) {
            submit.disabled = false;
            feedback.replaceChildren(el('p', { class: 'error' }, err.message));
          }
        }
      }, 'Check Answers');
      if (card.grade) showResult(card.grade, challenge.solution);
      return el('div', { class: 'card' },
        el('div', { class: 'row' }, el('h3', {}, challenge.title), el('span', { class: 'pill' }, challenge.level)),
        story,
        card.grade ? [] : submit,
        feedback);
    };

    const loadChallenges = async () => {
      const status = $('challenge-status');
      status.textContent = "Generating today's challenges with AI...";
      status.className = 'muted';
      try {
        const board = await api(`/api/challenges?level=${activeLevel}`);
        const list = $('challenge-list');
        list.replaceChildren(...board.challenges.map(challengeCard));
        status.textContent = board.challenges.length ? '' : 'No challenges at this level today.';
      } catch (err) {
        status.textContent = err.message;
        status.className = 'error';
      }
    };

    document.querySelectorAll('.levels button').forEach((b) => b.addEventListener('click', () => {
      activeLevel = b.dataset.level;
      document.querySelectorAll('.levels button').forEach((x) => x.classList.toggle('active', x === b));
      loadChallenges();
    }));

    const stat = (label, value) => el('div', { class: 'stat' }, el('span', { class: 'muted small' }, label), el('strong', {}, value));

    const loadProgress = async () => {
      const report = await api('/api/progress');
      const today = report.today || {};
      $('today-stats').replaceChildren(
        stat('Stories Analyzed', today.storiesAnalyzed || 0),
        stat('Mistakes Found', today.mistakesFound || 0),
        stat('Challenges Completed', today.challengesCompleted || 0),
        stat('Challenges Attempted', today.challengesAttempted || 0),
        stat('Accuracy', `${report.todayAccuracy}%`));
      const s = report.challengeStats;
      $('challenge-stats').replaceChildren(
        stat('Attempted', s.totalAttempted),
        stat('Correct', s.totalCorrect),
        stat('Success Rate', `${s.successRate}%`),
        ...s.byLevel.map((l) => stat(l.level, `${l.correct}/${l.attempted}`)));

      const bank = $('mistake-bank');
      bank.replaceChildren(...report.mistakeBank.map((m) => el('li', {}, el('div', { class: 'row' },
        el('div', {},
          el('div', { class: 'strike small' }, m.originalText),
          el('div', { class: 'ok small' }, m.correctedText),
          el('div', { class: 'muted small' }, `"${m.explanation}"`)),
        el('button', { onclick: async () => {
          await api(`/api/mistakes/${encodeURIComponent(m.id)}`, { method: 'DELETE' });
          loadProgress();
        } }, 'Remove')))));
      if (!report.mistakeBank.length) bank.append(el('li', { class: 'muted' }, 'Your saved mistakes will appear here.'));

      const completed = $('completed');
      completed.replaceChildren(...report.completedChallenges.map((c) => el('li', {}, el('div', { class: 'row' },
        el('div', {},
          el('span', { class: c.isCorrect ? 'ok' : 'error' }, c.isCorrect ? 'Correct ' : 'Incorrect '),
          el('span', { class: 'pill' }, c.level), ' ',
          el('span', { class: 'muted small' }, `${c.category} - ${new Date(c.completedAt).toLocaleString()}`)),
        el('button', { onclick: async () => {
          await api(`/api/completed/${encodeURIComponent(c.challengeId)}`, { method: 'DELETE' });
          loadProgress();
        } }, 'Remove')))));
      if (!report.completedChallenges.length) completed.append(el('li', { class: 'muted' }, 'Your completed challenges will appear here.'));
    };

    loadPrompt();
  </script>
</body>
</html>
"#;
