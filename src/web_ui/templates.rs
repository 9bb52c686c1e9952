//! Template engine setup and HTML templates.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Global template engine instance with embedded templates.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    // Embed templates directly in the binary (no external files needed)
    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("most_discussed.html", MOST_DISCUSSED_TEMPLATE),
        ("list.html", LIST_TEMPLATE),
        ("detail.html", DETAIL_TEMPLATE),
        ("edit_discussion.html", EDIT_DISCUSSION_TEMPLATE),
        ("delete_discussion.html", DELETE_DISCUSSION_TEMPLATE),
        ("login.html", LOGIN_TEMPLATE),
        ("signup.html", SIGNUP_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
        ("admin_reviews.html", ADMIN_REVIEWS_TEMPLATE),
        ("admin_review_form.html", ADMIN_REVIEW_FORM_TEMPLATE),
        ("admin_discussions.html", ADMIN_DISCUSSIONS_TEMPLATE),
    ])
    .expect("Failed to load templates");

    tera
});

/// Render a template with context
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

// =============================================================================
// Embedded Templates
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Reviews{% endblock %}</title>
    <style>
        :root {
            --bg: #0a0a0a;
            --bg-secondary: #141414;
            --foreground: #fafafa;
            --foreground-secondary: rgba(250, 250, 250, 0.7);
            --foreground-tertiary: rgba(250, 250, 250, 0.4);
            --border: #262626;
            --accent: #fafafa;
            --danger: #f87171;
        }

        * { box-sizing: border-box; margin: 0; padding: 0; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--foreground);
            line-height: 1.6;
            -webkit-font-smoothing: antialiased;
        }

        a { color: var(--accent); text-decoration: none; }
        a:hover { text-decoration: underline; }

        header {
            border-bottom: 1px solid var(--border);
            padding: 16px 24px;
            display: flex;
            align-items: center;
            justify-content: space-between;
        }
        header .brand { font-weight: 700; font-size: 18px; }
        header nav a { margin-left: 16px; color: var(--foreground-secondary); }

        main {
            max-width: 960px;
            margin: 0 auto;
            padding: 32px 24px;
            display: flex;
            gap: 48px;
        }
        .content { flex: 1; min-width: 0; }
        aside { width: 260px; flex-shrink: 0; }

        article.review { border-bottom: 1px solid var(--border); padding: 24px 0; }
        article.review h2 { font-size: 22px; margin-bottom: 4px; }
        .meta { color: var(--foreground-tertiary); font-size: 13px; margin-bottom: 12px; }
        .body-text { color: var(--foreground-secondary); white-space: pre-line; }

        .tag-chip {
            display: inline-block;
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 0 10px;
            font-size: 12px;
            margin-right: 6px;
        }

        .pagination { margin-top: 24px; color: var(--foreground-secondary); font-size: 14px; }
        .pagination a { margin: 0 8px; }

        .sidebar-box {
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            border-radius: 8px;
            padding: 16px;
        }
        .sidebar-box h3 { font-size: 14px; margin-bottom: 12px; }
        .sidebar-box li { margin-bottom: 8px; font-size: 14px; list-style: none; }
        .sidebar-box .count { color: var(--foreground-tertiary); font-size: 12px; }

        .discussion {
            border: 1px solid var(--border);
            border-radius: 8px;
            padding: 12px 16px;
            margin-bottom: 12px;
        }
        .discussion .who { font-size: 13px; color: var(--foreground-tertiary); margin-bottom: 4px; }
        .discussion .actions { margin-top: 8px; font-size: 12px; }
        .discussion .actions a { color: var(--foreground-tertiary); margin-right: 12px; }

        form.stacked label { display: block; margin: 12px 0 4px; font-size: 13px; color: var(--foreground-secondary); }
        input[type=text], input[type=password], input[type=email], textarea, select {
            width: 100%;
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            border-radius: 6px;
            color: var(--foreground);
            padding: 8px 10px;
            font: inherit;
        }
        textarea { min-height: 120px; resize: vertical; }
        button {
            margin-top: 16px;
            background: var(--accent);
            color: var(--bg);
            border: none;
            border-radius: 6px;
            padding: 8px 18px;
            font: inherit;
            font-weight: 600;
            cursor: pointer;
        }
        button.danger { background: var(--danger); color: var(--bg); }

        .errors { color: var(--danger); font-size: 14px; margin: 8px 0; }
        .errors li { list-style: none; }
        .notice { color: var(--foreground-secondary); font-size: 14px; margin: 8px 0; }

        table { width: 100%; border-collapse: collapse; font-size: 14px; }
        th, td { text-align: left; padding: 8px 10px; border-bottom: 1px solid var(--border); }
        th { color: var(--foreground-tertiary); font-weight: 500; }

        .filter-bar { display: flex; gap: 12px; margin-bottom: 20px; align-items: flex-end; }
        .filter-bar input, .filter-bar select { width: auto; }
        .filter-bar button { margin-top: 0; }
    </style>
</head>
<body>
    <header>
        <a href="/" class="brand">Reviews</a>
        <nav>
            {% if current_user_is_admin %}
                <a href="/admin/reviews">Admin</a>
            {% endif %}
            {% if current_user %}
                <span>{{ current_user }}</span>
                <a href="/-/logout">Sign out</a>
            {% else %}
                <a href="/-/login">Sign in</a>
                <a href="/-/signup">Sign up</a>
            {% endif %}
        </nav>
    </header>
    <main>
        {% block content %}{% endblock %}
    </main>
</body>
</html>
"##;

// Most-discussed sidebar shared by the listing and detail pages
const MOST_DISCUSSED_TEMPLATE: &str = r##"
        <div class="sidebar-box">
            <h3>Most discussed</h3>
            <ul>
                {% for m in most_discussed %}
                <li>
                    <a href="{{ m.url }}">{{ m.title }}</a>
                    <span class="count">({{ m.discussion_count }})</span>
                </li>
                {% endfor %}
            </ul>
        </div>
"##;

const LIST_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{% if tag %}Reviews tagged '{{ tag.name }}'{% else %}Reviews{% endif %}{% endblock %}
{% block content %}
    <div class="content">
        {% if tag %}
            <h1>Reviews tagged '{{ tag.name }}'</h1>
        {% else %}
            <h1>Latest reviews</h1>
        {% endif %}

        {% for r in reviews %}
        <article class="review">
            <h2><a href="{{ r.url }}">{{ r.title }}</a></h2>
            <div class="meta">
                by {{ r.author }} · {{ r.published }} · updated {{ r.updated }}
                {% for t in r.tags %}<a class="tag-chip" href="/tag/{{ t.slug }}">{{ t.name }}</a>{% endfor %}
            </div>
            <div class="body-text">{{ r.body | truncate(length=280) }}</div>
        </article>
        {% endfor %}
        {% if reviews | length == 0 %}
            <p class="notice">Nothing published yet.</p>
        {% endif %}

        <div class="pagination">
            {% if has_prev %}<a href="?page={{ prev_page }}">&laquo; newer</a>{% endif %}
            Page {{ page }} of {{ num_pages }}
            {% if has_next %}<a href="?page={{ next_page }}">older &raquo;</a>{% endif %}
        </div>
    </div>
    <aside>{% include "most_discussed.html" %}</aside>
{% endblock %}
"##;

const DETAIL_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ review.title }}{% endblock %}
{% block content %}
    <div class="content">
        <article class="review">
            <h1>{{ review.title }}</h1>
            <div class="meta">
                by {{ review.author }} · {{ review.published }}
                {% for t in review.tags %}<a class="tag-chip" href="/tag/{{ t.slug }}">{{ t.name }}</a>{% endfor %}
            </div>
            <div class="body-text">{{ review.body }}</div>
        </article>

        <section>
            <h2>Discussion ({{ discussion_count }})</h2>
            {% for d in discussions %}
            <div class="discussion">
                <div class="who">{{ d.author }} · {{ d.created }}</div>
                <div class="body-text">{{ d.body }}</div>
                {% if d.is_owner %}
                <div class="actions">
                    <a href="/discussions/{{ d.id }}/edit">Edit</a>
                    <a href="/discussions/{{ d.id }}/delete">Delete</a>
                </div>
                {% endif %}
            </div>
            {% endfor %}
            {% if discussions | length == 0 %}
                <p class="notice">No discussions yet.</p>
            {% endif %}

            {% if current_user %}
            <form class="stacked" method="post" action="/reviews/{{ review.id }}/discuss">
                {% if form_errors | length > 0 %}
                <ul class="errors">
                    {% for e in form_errors %}<li>{{ e }}</li>{% endfor %}
                </ul>
                {% endif %}
                <label for="body">Join the discussion</label>
                <textarea id="body" name="body" maxlength="800">{{ form_body }}</textarea>
                <input type="hidden" name="csrf_token" value="{{ csrf_token }}">
                <button type="submit">Post</button>
            </form>
            {% else %}
            <p class="notice"><a href="/-/login">Sign in</a> to join the discussion.</p>
            {% endif %}
        </section>
    </div>
    <aside>{% include "most_discussed.html" %}</aside>
{% endblock %}
"##;

const EDIT_DISCUSSION_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Edit discussion{% endblock %}
{% block content %}
    <div class="content">
        <h1>Edit discussion</h1>
        <p class="notice">On <a href="{{ review_url }}">{{ review_title }}</a></p>
        {% if form_errors | length > 0 %}
        <ul class="errors">
            {% for e in form_errors %}<li>{{ e }}</li>{% endfor %}
        </ul>
        {% endif %}
        <form class="stacked" method="post" action="/discussions/{{ discussion_id }}/edit">
            <label for="body">Text</label>
            <textarea id="body" name="body" maxlength="800">{{ body }}</textarea>
            <input type="hidden" name="csrf_token" value="{{ csrf_token }}">
            <button type="submit">Save</button>
        </form>
    </div>
{% endblock %}
"##;

const DELETE_DISCUSSION_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Delete discussion{% endblock %}
{% block content %}
    <div class="content">
        <h1>Delete discussion?</h1>
        <p class="notice">This permanently removes your entry on <a href="{{ review_url }}">{{ review_title }}</a>:</p>
        <div class="discussion"><div class="body-text">{{ body }}</div></div>
        <form method="post" action="/discussions/{{ discussion_id }}/delete">
            <input type="hidden" name="csrf_token" value="{{ csrf_token }}">
            <button type="submit" class="danger">Delete</button>
        </form>
        <p class="notice"><a href="{{ review_url }}">Cancel</a></p>
    </div>
{% endblock %}
"##;

const LOGIN_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Sign in{% endblock %}
{% block content %}
    <div class="content">
        <h1>Sign in</h1>
        {% if error %}<p class="errors">{{ error }}</p>{% endif %}
        {% if message %}<p class="notice">{{ message }}</p>{% endif %}
        <form class="stacked" method="post" action="/-/login">
            <label for="username">Username</label>
            <input type="text" id="username" name="username" required>
            <label for="password">Password</label>
            <input type="password" id="password" name="password" required>
            <button type="submit">Sign in</button>
        </form>
        <p class="notice">No account? <a href="/-/signup">Sign up</a></p>
    </div>
{% endblock %}
"##;

const SIGNUP_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Sign up{% endblock %}
{% block content %}
    <div class="content">
        <h1>Sign up</h1>
        {% if error %}<p class="errors">{{ error }}</p>{% endif %}
        <form class="stacked" method="post" action="/-/signup">
            <label for="username">Username</label>
            <input type="text" id="username" name="username" required>
            <label for="email">Email (optional)</label>
            <input type="email" id="email" name="email">
            <label for="password">Password</label>
            <input type="password" id="password" name="password" required>
            <button type="submit">Create account</button>
        </form>
    </div>
{% endblock %}
"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Not found{% endblock %}
{% block content %}
    <div class="content">
        <h1>Sorry</h1>
        <p class="notice">{{ message }}</p>
        <p><a href="/">Back to the reviews</a></p>
    </div>
{% endblock %}
"##;

const ADMIN_REVIEWS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · Reviews{% endblock %}
{% block content %}
    <div class="content">
        <h1>Reviews</h1>
        <p class="notice">
            <a href="/admin/reviews/new">New review</a> ·
            <a href="/admin/discussions">Moderate discussions</a>
        </p>
        <form class="filter-bar" method="get" action="/admin/reviews">
            <select name="status">
                <option value="" {% if status_filter == "" %}selected{% endif %}>All statuses</option>
                <option value="DF" {% if status_filter == "DF" %}selected{% endif %}>Draft</option>
                <option value="PB" {% if status_filter == "PB" %}selected{% endif %}>Published</option>
            </select>
            <input type="text" name="q" placeholder="Search title or body" value="{{ q }}">
            <button type="submit">Filter</button>
        </form>
        <table>
            <tr><th>Title</th><th>Slug</th><th>Author</th><th>Created</th><th>Status</th></tr>
            {% for r in rows %}
            <tr>
                <td><a href="/admin/reviews/{{ r.id }}/edit">{{ r.title }}</a></td>
                <td>{{ r.slug }}</td>
                <td>{{ r.author }}</td>
                <td>{{ r.created }}</td>
                <td>{{ r.status }}</td>
            </tr>
            {% endfor %}
        </table>
    </div>
{% endblock %}
"##;

const ADMIN_REVIEW_FORM_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · {{ heading }}{% endblock %}
{% block content %}
    <div class="content">
        <h1>{{ heading }}</h1>
        {% if form_errors | length > 0 %}
        <ul class="errors">
            {% for e in form_errors %}<li>{{ e }}</li>{% endfor %}
        </ul>
        {% endif %}
        <form class="stacked" method="post" action="{{ form_action }}">
            <label for="title">Title</label>
            <input type="text" id="title" name="title" value="{{ title }}">
            <label for="slug">Slug (leave blank to derive from the title)</label>
            <input type="text" id="slug" name="slug" value="{{ slug }}">
            <label for="body">Body</label>
            <textarea id="body" name="body" rows="12">{{ body }}</textarea>
            <label for="status">Status</label>
            <select id="status" name="status">
                <option value="DF" {% if status == "DF" %}selected{% endif %}>Draft</option>
                <option value="PB" {% if status == "PB" %}selected{% endif %}>Published</option>
            </select>
            <label for="tags">Tags (comma separated)</label>
            <input type="text" id="tags" name="tags" value="{{ tags }}">
            <input type="hidden" name="csrf_token" value="{{ csrf_token }}">
            <button type="submit">Save</button>
        </form>
        <p class="notice"><a href="/admin/reviews">Back to reviews</a></p>
    </div>
{% endblock %}
"##;

const ADMIN_DISCUSSIONS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · Discussions{% endblock %}
{% block content %}
    <div class="content">
        <h1>Discussions</h1>
        <p class="notice"><a href="/admin/reviews">Back to reviews</a></p>
        <form class="filter-bar" method="get" action="/admin/discussions">
            <select name="active">
                <option value="" {% if active_filter == "" %}selected{% endif %}>All</option>
                <option value="1" {% if active_filter == "1" %}selected{% endif %}>Active</option>
                <option value="0" {% if active_filter == "0" %}selected{% endif %}>Hidden</option>
            </select>
            <input type="text" name="q" placeholder="Search body" value="{{ q }}">
            <button type="submit">Filter</button>
        </form>
        <table>
            <tr><th>User</th><th>Review</th><th>Text</th><th>Created</th><th>Active</th><th></th></tr>
            {% for d in rows %}
            <tr>
                <td>{{ d.author }}</td>
                <td>{{ d.review_title }}</td>
                <td>{{ d.body | truncate(length=80) }}</td>
                <td>{{ d.created }}</td>
                <td>{% if d.is_active %}yes{% else %}no{% endif %}</td>
                <td>
                    <form method="post" action="/admin/discussions/{{ d.id }}/toggle">
                        <input type="hidden" name="csrf_token" value="{{ csrf_token }}">
                        <button type="submit">{% if d.is_active %}Hide{% else %}Restore{% endif %}</button>
                    </form>
                </td>
            </tr>
            {% endfor %}
        </table>
    </div>
{% endblock %}
"##;
